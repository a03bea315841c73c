//! FRED (Federal Reserve Economic Data) macro-series client.
//!
//! Resolves a series code such as `NEWORDER` to its most recent non-missing
//! observation via the `series/observations` endpoint. FRED encodes missing
//! values as `"."`; those rows are skipped.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, MacroProvider};
use crate::domain::Observation;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Rows requested per call. Newest first, so a handful covers any run of `"."`.
const OBSERVATION_LIMIT: usize = 12;

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct FredErrorBody {
    error_message: Option<String>,
}

pub struct FredClient {
    client: reqwest::blocking::Client,
    api_key: Option<String>,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
}

impl FredClient {
    /// Build a client. A missing key is not an error here; every lookup then
    /// fails with [`DataError::AuthenticationRequired`].
    pub fn new(
        api_key: Option<String>,
        timeout: Duration,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            circuit_breaker,
            base_url: FRED_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn observations_request(
        &self,
        series_code: &str,
        api_key: &str,
    ) -> reqwest::blocking::RequestBuilder {
        let limit = OBSERVATION_LIMIT.to_string();
        self.client.get(&self.base_url).query(&[
            ("series_id", series_code),
            ("api_key", api_key),
            ("file_type", "json"),
            ("sort_order", "desc"),
            ("limit", limit.as_str()),
        ])
    }
}

/// Transport failure as a [`DataError`]. The request URL carries the API key,
/// so it is stripped before the error is rendered.
fn transport_error(e: reqwest::Error) -> DataError {
    DataError::NetworkUnreachable(e.without_url().to_string())
}

/// Pick the newest non-missing observation out of a FRED JSON payload.
///
/// Rows may arrive in either order; the latest date wins.
pub fn parse_observations(series_code: &str, body: &str) -> Result<Observation, DataError> {
    let parsed: ObservationsResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("FRED payload for {series_code}: {e}"))
    })?;

    let mut latest: Option<Observation> = None;
    for raw in parsed.observations {
        if raw.value.trim() == "." {
            continue;
        }
        let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d").map_err(|e| {
            DataError::ResponseFormatChanged(format!("bad FRED date {:?}: {e}", raw.date))
        })?;
        let value: f64 = raw.value.trim().parse().map_err(|_| {
            DataError::ResponseFormatChanged(format!("bad FRED value {:?}", raw.value))
        })?;
        match latest {
            Some(l) if l.date >= date => {}
            _ => latest = Some(Observation { date, value }),
        }
    }

    latest.ok_or_else(|| DataError::SeriesNotFound {
        series: series_code.to_string(),
    })
}

impl MacroProvider for FredClient {
    fn name(&self) -> &str {
        "fred"
    }

    fn latest(&self, series_code: &str) -> Result<Observation, DataError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DataError::AuthenticationRequired("FRED_API_KEY is not set".into())
        })?;

        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        debug!(series = series_code, "fetching FRED observations");
        let resp = self
            .observations_request(series_code, api_key)
            .send()
            .map_err(|e| {
                self.circuit_breaker.record_failure();
                transport_error(e)
            })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| {
            self.circuit_breaker.record_failure();
            transport_error(e)
        })?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.circuit_breaker.record_failure();
            return Err(DataError::RateLimited {
                retry_after_secs: 60,
            });
        }

        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::FORBIDDEN {
            // FRED answers 400 for both a bad key and an unknown series id.
            let message = serde_json::from_str::<FredErrorBody>(&body)
                .ok()
                .and_then(|b| b.error_message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            if message.to_ascii_lowercase().contains("api_key") {
                return Err(DataError::AuthenticationRequired(message));
            }
            return Err(DataError::SeriesNotFound {
                series: series_code.to_string(),
            });
        }

        if !status.is_success() {
            self.circuit_breaker.record_failure();
            return Err(DataError::Other(format!("HTTP {status} for {series_code}")));
        }

        let observation = parse_observations(series_code, &body)?;
        self.circuit_breaker.record_success();
        Ok(observation)
    }
}
