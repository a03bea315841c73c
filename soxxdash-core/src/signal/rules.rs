//! Threshold scoring rules.

use super::source::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// `+1` above `upper`, `-1` below `lower`, `0` otherwise (boundaries included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub upper: f64,
    pub lower: f64,
}

impl ThresholdRule {
    pub const fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    pub fn score(&self, value: f64) -> i32 {
        if value > self.upper {
            1
        } else if value < self.lower {
            -1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("{id}: thresholds must be finite (upper {upper}, lower {lower})")]
    NonFinite { id: SourceId, upper: f64, lower: f64 },

    #[error("{id}: upper threshold {upper} is below lower threshold {lower}")]
    Inverted { id: SourceId, upper: f64, lower: f64 },

    #[error("{0}: the macro composite is a scenario sum and takes no threshold rule")]
    NotThresholded(SourceId),
}

/// Threshold rule per source. Every thresholded source always has a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    rules: BTreeMap<SourceId, ThresholdRule>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        let rules = [
            (SourceId::Rsi, ThresholdRule::new(55.0, 45.0)),
            (SourceId::Macd, ThresholdRule::new(0.2, -0.2)),
            (SourceId::Roc3m, ThresholdRule::new(5.0, -2.0)),
            (SourceId::RelativeStrengthTrend, ThresholdRule::new(0.001, -0.001)),
            (SourceId::Capex, ThresholdRule::new(25_000.0, 24_000.0)),
            (SourceId::SemiSalesYoy, ThresholdRule::new(0.0, 0.0)),
            (SourceId::DramPrice, ThresholdRule::new(4.0, 3.5)),
            (SourceId::DramTrend, ThresholdRule::new(0.01, -0.01)),
            (SourceId::NandPrice, ThresholdRule::new(4.75, 4.60)),
            (SourceId::NandTrend, ThresholdRule::new(0.005, -0.005)),
            (SourceId::BookToBill, ThresholdRule::new(1.05, 0.95)),
        ]
        .into_iter()
        .collect();
        Self { rules }
    }
}

impl ScoringRules {
    /// Rule for a thresholded source; `None` for the macro composite.
    pub fn rule(&self, source: SourceId) -> Option<ThresholdRule> {
        self.rules.get(&source).copied()
    }

    /// Replace one source's rule after validating it.
    pub fn with_rule(mut self, source: SourceId, rule: ThresholdRule) -> Result<Self, RuleError> {
        validate(source, rule)?;
        self.rules.insert(source, rule);
        Ok(self)
    }
}

fn validate(id: SourceId, rule: ThresholdRule) -> Result<(), RuleError> {
    let ThresholdRule { upper, lower } = rule;
    if !id.is_thresholded() {
        return Err(RuleError::NotThresholded(id));
    }
    if !upper.is_finite() || !lower.is_finite() {
        return Err(RuleError::NonFinite { id, upper, lower });
    }
    if upper < lower {
        return Err(RuleError::Inverted { id, upper, lower });
    }
    Ok(())
}
