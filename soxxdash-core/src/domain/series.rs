//! Price and observation series, the fundamental input units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily closing price for a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered daily closes for one instrument.
///
/// Always ascending by date with no duplicate dates. Construction sorts the
/// input and keeps the last observation for a repeated date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points: normalize(points, |p| p.date),
        }
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_closes(symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// A dated scalar from a macro or commodity source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Date-indexed numeric column (DRAM prices, book-to-bill, relative strength...).
///
/// Same ordering guarantees as [`PriceSeries`]. Values may be `NaN` where the
/// source had a blank cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    name: String,
    points: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(name: impl Into<String>, points: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            points: normalize(points, |p| p.date),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Value of the most recent row, as stored (may be `NaN`).
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sort ascending by date; on duplicate dates the later input row wins.
fn normalize<T>(mut points: Vec<T>, date: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    // Stable sort keeps input order among equal dates.
    points.sort_by_key(|p| date(p));
    let mut out: Vec<T> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(last) if date(last) == date(&point) => *last = point,
            _ => out.push(point),
        }
    }
    out
}
