//! Domain types for the dashboard.

pub mod series;

pub use series::{Observation, ObservationSeries, PricePoint, PriceSeries};
