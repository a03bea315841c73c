//! Relative Strength Index (RSI).
//!
//! Simple rolling means of gains and losses over the trailing `window` deltas.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: window.
//! Edge cases: avg_loss == 0 with gains → RSI = 100; flat window (0/0) → NaN.

use super::Indicator;
use crate::domain::PriceSeries;

#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    name: String,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            name: format!("rsi_{window}"),
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        let closes = series.closes();
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.window + 1 {
            return result;
        }

        // Split deltas into gains and losses; index 0 has no delta.
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let delta = closes[i] - closes[i - 1];
            if delta.is_nan() {
                continue;
            }
            gains[i] = if delta > 0.0 { delta } else { 0.0 };
            losses[i] = if delta < 0.0 { -delta } else { 0.0 };
        }

        for i in self.window..n {
            let start = i + 1 - self.window;
            let gain_window = &gains[start..=i];
            let loss_window = &losses[start..=i];
            if gain_window.iter().any(|v| v.is_nan()) {
                continue;
            }
            let avg_gain = gain_window.iter().sum::<f64>() / self.window as f64;
            let avg_loss = loss_window.iter().sum::<f64>() / self.window as f64;
            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            f64::NAN
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
