//! Cross-asset relative strength.
//!
//! RS[t] = A[t] / B[t] over the dates both series share.
//! Undefined where either close is NaN or B[t] == 0.

use crate::data::align::align_pair;
use crate::domain::{Observation, ObservationSeries, PriceSeries};

/// Ratio of `asset` to `benchmark` on every overlapping date.
///
/// The result is named `"{asset}/{benchmark}"`. Undefined points are kept as
/// `NaN` so the date index stays aligned with the overlap.
pub fn relative_strength(asset: &PriceSeries, benchmark: &PriceSeries) -> ObservationSeries {
    let aligned = align_pair(asset, benchmark);
    let points = aligned
        .rows()
        .map(|(date, a, b)| {
            let value = if a.is_nan() || b.is_nan() || b == 0.0 {
                f64::NAN
            } else {
                a / b
            };
            Observation { date, value }
        })
        .collect();
    ObservationSeries::new(format!("{}/{}", asset.symbol(), benchmark.symbol()), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(symbol: &str, rows: &[(&str, f64)]) -> PriceSeries {
        PriceSeries::new(
            symbol,
            rows.iter()
                .map(|&(date, close)| PricePoint {
                    date: d(date),
                    close,
                })
                .collect(),
        )
    }

    #[test]
    fn ratio_over_overlapping_dates_only() {
        let soxx = series(
            "SOXX",
            &[("2024-01-02", 200.0), ("2024-01-03", 210.0), ("2024-01-04", 220.0)],
        );
        let spy = series("SPY", &[("2024-01-03", 420.0), ("2024-01-04", 440.0), ("2024-01-05", 450.0)]);

        let rs = relative_strength(&soxx, &spy);
        assert_eq!(rs.name(), "SOXX/SPY");
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.points()[0].date, d("2024-01-03"));
        assert_approx(rs.points()[0].value, 0.5, DEFAULT_EPSILON);
        assert_approx(rs.points()[1].value, 0.5, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_benchmark_is_undefined() {
        let soxx = series("SOXX", &[("2024-01-02", 200.0), ("2024-01-03", 210.0)]);
        let spy = series("SPY", &[("2024-01-02", 0.0), ("2024-01-03", 420.0)]);

        let rs = relative_strength(&soxx, &spy);
        assert!(rs.points()[0].value.is_nan());
        assert_approx(rs.points()[1].value, 0.5, DEFAULT_EPSILON);
    }

    #[test]
    fn disjoint_series_produce_empty_ratio() {
        let soxx = series("SOXX", &[("2024-01-02", 200.0)]);
        let spy = series("SPY", &[("2024-01-03", 420.0)]);
        assert!(relative_strength(&soxx, &spy).is_empty());
    }
}
