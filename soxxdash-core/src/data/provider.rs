//! Data provider traits and structured error types.
//!
//! `PriceProvider` abstracts over price-history sources (Yahoo Finance, test
//! doubles) and `MacroProvider` over scalar macro series (FRED). The dashboard
//! only sees these traits, so every adapter can be swapped or mocked.

use crate::domain::{Observation, PriceSeries};
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for data operations.
///
/// These never abort an evaluation: the dashboard converts them into an
/// unavailable reading for the affected source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("series not found: {series}")]
    SeriesNotFound { series: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("csv error: {0}")]
    Csv(String),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// True for missing or rejected credentials (reported as a configuration warning).
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, DataError::AuthenticationRequired(_))
    }
}

/// Trait for daily price-history providers.
pub trait PriceProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes for a symbol over a date range (inclusive).
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}

/// Trait for macro-series providers that resolve a series code to its latest value.
pub trait MacroProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Latest non-missing observation of a series (e.g. `NEWORDER`).
    fn latest(&self, series_code: &str) -> Result<Observation, DataError>;
}
