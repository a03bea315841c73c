//! MACD histogram.
//!
//! MACD   = EMA(fast) - EMA(slow)
//! Signal = EMA(signal) of MACD
//! Histogram = MACD - Signal
//! Lookback: slow + signal - 2 (first histogram value once the signal EMA is seeded).

use super::ema::ema_of_series;
use super::Indicator;
use crate::domain::PriceSeries;

#[derive(Debug, Clone)]
pub struct MacdHistogram {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl MacdHistogram {
    /// Periods are clamped to >= 1; `slow` is raised to at least `fast`.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        let fast = fast.max(1);
        let slow = slow.max(fast);
        let signal = signal.max(1);
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_hist_{fast}_{slow}_{signal}"),
        }
    }

    pub fn periods(&self) -> (usize, usize, usize) {
        (self.fast, self.slow, self.signal)
    }
}

impl Default for MacdHistogram {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Indicator for MacdHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow + self.signal - 2
    }

    fn compute(&self, series: &PriceSeries) -> Vec<f64> {
        let closes = series.closes();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = ema_of_series(&macd_line, self.signal);

        macd_line
            .iter()
            .zip(&signal_line)
            .map(|(m, s)| m - s)
            .collect()
    }
}
