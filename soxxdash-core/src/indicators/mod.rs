//! Indicator library.
//!
//! Indicators are pure functions: price history in, numeric series out. Output
//! has the same length as the input; points without enough history (or with an
//! arithmetically undefined value) are `f64::NAN`. Short or empty input never
//! errors, it just produces an all-`NaN` series.
//!
//! Relative strength takes two series and is exposed as a free function.

pub mod ema;
pub mod macd;
pub mod relative_strength;
pub mod roc;
pub mod rsi;

pub use ema::ema_of_series;
pub use macd::MacdHistogram;
pub use relative_strength::relative_strength;
pub use roc::Roc;
pub use rsi::Rsi;

use crate::domain::PriceSeries;

/// Trait for single-series indicators.
///
/// # Look-ahead contamination guard
/// No value at index t may depend on prices after t. Every indicator must pass
/// the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14", "roc_63").
    fn name(&self) -> &str;

    /// Number of leading points that are always undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    fn compute(&self, series: &PriceSeries) -> Vec<f64>;
}

/// Last defined (finite) value of an indicator series.
pub fn latest_defined(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| v.is_finite())
}

/// Mean first difference over the trailing `window` defined values.
///
/// With `window = 5` this averages the four most recent changes. Undefined
/// values are dropped before the window is taken. Returns `None` when fewer
/// than `window` defined values exist or `window < 2`.
pub fn trailing_mean_change(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 {
        return None;
    }
    let defined: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if defined.len() < window {
        return None;
    }
    let tail = &defined[defined.len() - window..];
    let sum: f64 = tail.windows(2).map(|w| w[1] - w[0]).sum();
    Some(sum / (window - 1) as f64)
}

/// Round to a fixed number of decimals (display precision of the dashboard).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Create a price series from closes for testing (consecutive days from 2024-01-02).
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    PriceSeries::from_closes("TEST", base_date, closes)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_defined_skips_trailing_nan() {
        assert_eq!(latest_defined(&[1.0, 2.0, f64::NAN]), Some(2.0));
        assert_eq!(latest_defined(&[f64::NAN, f64::NAN]), None);
        assert_eq!(latest_defined(&[]), None);
    }

    #[test]
    fn trailing_mean_change_uses_last_window() {
        // Last five: 2, 3, 5, 6, 10 → diffs 1, 2, 1, 4 → mean 2
        let values = [100.0, 2.0, 3.0, 5.0, 6.0, 10.0];
        assert_approx(trailing_mean_change(&values, 5).unwrap(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn trailing_mean_change_needs_full_window() {
        assert_eq!(trailing_mean_change(&[1.0, 2.0, 3.0, 4.0], 5), None);
        assert_eq!(trailing_mean_change(&[1.0, 2.0], 1), None);
    }

    #[test]
    fn trailing_mean_change_drops_undefined() {
        let values = [1.0, f64::NAN, 2.0, 3.0, f64::NAN, 4.0, 5.0];
        assert_approx(trailing_mean_change(&values, 5).unwrap(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(55.004, 2), 55.0);
        assert_eq!(round_to(-0.216, 2), -0.22);
        assert_eq!(round_to(6.5, 2), 6.5);
    }
}
