//! Deterministic synthetic price history.
//!
//! Used when a live fetch fails and the caller opted into a synthetic
//! fallback. The walk is seeded from the symbol name, so the same symbol and
//! date range always produce the same series.

use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Weekday-only random walk starting at 100 with ±3% daily moves.
pub fn synthetic_series(symbol: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
    let seed = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            price *= 1.0 + daily_return;
            points.push(PricePoint {
                date: current,
                close: price,
            });
        }
        current += chrono::Duration::days(1);
    }

    PriceSeries::new(symbol, points)
}
