//! Data adapters: price history, macro series and local CSV files.

pub mod align;
pub mod circuit_breaker;
pub mod csv_series;
pub mod fred;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use align::{align_pair, AlignedPair};
pub use circuit_breaker::CircuitBreaker;
pub use csv_series::load_csv_series;
pub use fred::FredClient;
pub use provider::{DataError, MacroProvider, PriceProvider};
pub use synthetic::synthetic_series;
pub use yahoo::YahooProvider;
