//! Rate of Change (ROC).
//!
//! Percentage price change over N points.
//! ROC[t] = (close[t] - close[t-period]) / close[t-period] * 100
//! Lookback: period. Undefined where close[t-period] == 0.

use super::Indicator;
use crate::domain::PriceSeries;

/// Roughly three months of trading days.
pub const THREE_MONTH_PERIOD: usize = 63;

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    name: String,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("roc_{period}"),
        }
    }

    pub fn three_month() -> Self {
        Self::new(THREE_MONTH_PERIOD)
    }
}

impl Indicator for Roc {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        let closes = series.closes();
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let prev = closes[i - self.period];
            let curr = closes[i];
            if prev.is_nan() || curr.is_nan() || prev == 0.0 {
                continue;
            }
            result[i] = (curr - prev) / prev * 100.0;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn roc_basic() {
        let result = Roc::new(1).compute(&make_series(&[100.0, 110.0, 121.0]));
        assert!(result[0].is_nan());
        assert_approx(result[1], 10.0, DEFAULT_EPSILON);
        assert_approx(result[2], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_period_2() {
        let result = Roc::new(2).compute(&make_series(&[100.0, 110.0, 121.0]));
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 21.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_negative() {
        let result = Roc::new(1).compute(&make_series(&[100.0, 90.0]));
        assert_approx(result[1], -10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_zero_base_is_undefined() {
        let result = Roc::new(1).compute(&make_series(&[0.0, 5.0, 10.0]));
        assert!(result[1].is_nan());
        assert_approx(result[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_short_input_is_all_nan() {
        let result = Roc::three_month().compute(&make_series(&[100.0; 63]));
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn roc_nan_propagation() {
        let result = Roc::new(1).compute(&make_series(&[100.0, f64::NAN, 120.0]));
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
    }

    #[test]
    fn roc_lookback() {
        assert_eq!(Roc::three_month().lookback(), 63);
    }
}
