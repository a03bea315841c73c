//! Input fingerprinting: deterministic identity of one evaluation's readings.
//!
//! Two evaluations with the same fingerprint saw the same resolved numbers
//! and the same macro scenario, so they must produce the same breakdown.
//! Unavailability reasons are not hashed: a source that failed for a different
//! reason still scored 0.

use crate::signal::{SignalInputs, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded BLAKE3 hash over the resolved inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFingerprint(pub String);

impl InputFingerprint {
    pub fn of(inputs: &SignalInputs) -> Self {
        let mut hasher = blake3::Hasher::new();
        for source in SourceId::ALL.into_iter().filter(|s| s.is_thresholded()) {
            hasher.update(source.key().as_bytes());
            match inputs.value(source).resolved() {
                Some(v) => {
                    hasher.update(&[1]);
                    hasher.update(&v.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        let scenario = inputs.scenario().map(|s| s.to_string()).unwrap_or_default();
        hasher.update(b"scenario");
        hasher.update(scenario.as_bytes());
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for log lines and the text report.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for InputFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
