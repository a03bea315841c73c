//! Two-series time alignment.
//!
//! Relative strength is only defined where both instruments traded, so the
//! pair is aligned on the intersection of their dates. No forward-fill.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Two price series restricted to their common dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    /// Common date axis (sorted ascending).
    pub dates: Vec<NaiveDate>,
    /// Left-hand closes, same length as `dates`.
    pub left: Vec<f64>,
    /// Right-hand closes, same length as `dates`.
    pub right: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate `(date, left, right)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64, f64)> + '_ {
        self.dates
            .iter()
            .zip(&self.left)
            .zip(&self.right)
            .map(|((&date, &l), &r)| (date, l, r))
    }
}

/// Align two series on the dates present in both.
pub fn align_pair(left: &PriceSeries, right: &PriceSeries) -> AlignedPair {
    let right_by_date: HashMap<NaiveDate, f64> =
        right.points().iter().map(|p| (p.date, p.close)).collect();

    let mut aligned = AlignedPair {
        dates: Vec::new(),
        left: Vec::new(),
        right: Vec::new(),
    };

    // Left is already sorted, so the intersection comes out sorted too.
    for point in left.points() {
        if let Some(&r) = right_by_date.get(&point.date) {
            aligned.dates.push(point.date);
            aligned.left.push(point.close);
            aligned.right.push(r);
        }
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn align_keeps_intersection_only() {
        let soxx = PriceSeries::from_closes("SOXX", base(), &[1.0, 2.0, 3.0, 4.0]);
        let spy = PriceSeries::from_closes(
            "SPY",
            base() + chrono::Duration::days(2),
            &[30.0, 40.0, 50.0],
        );

        let aligned = align_pair(&soxx, &spy);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.left, vec![3.0, 4.0]);
        assert_eq!(aligned.right, vec![30.0, 40.0]);
        assert_eq!(aligned.dates[0], base() + chrono::Duration::days(2));
    }

    #[test]
    fn align_with_empty_side_is_empty() {
        let soxx = PriceSeries::from_closes("SOXX", base(), &[1.0, 2.0]);
        let spy = PriceSeries::new("SPY", Vec::new());
        assert!(align_pair(&soxx, &spy).is_empty());
        assert!(align_pair(&spy, &soxx).is_empty());
    }

    #[test]
    fn rows_yield_triples_in_date_order() {
        let a = PriceSeries::from_closes("A", base(), &[1.0, 2.0]);
        let b = PriceSeries::from_closes("B", base(), &[10.0, 20.0]);
        let rows: Vec<_> = align_pair(&a, &b).rows().collect();
        assert_eq!(rows, vec![(base(), 1.0, 10.0), (base() + chrono::Duration::days(1), 2.0, 20.0)]);
    }
}
