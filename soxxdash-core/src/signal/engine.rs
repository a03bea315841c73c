//! Composite signal engine.
//!
//! Scores every source independently against its threshold rule, adds the
//! simulated macro composite, and classifies the sum. A source without a
//! usable reading contributes 0 and is still listed in the breakdown.

use super::rules::ScoringRules;
use super::scenario::{MacroBreakdown, MacroScenario};
use super::source::{SourceId, SourceValue};
use crate::fingerprint::InputFingerprint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Composite score at or above which the signal is BUY.
pub const BUY_THRESHOLD: i32 = 3;
/// Composite score at or below which the signal is SELL.
pub const SELL_THRESHOLD: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl Signal {
    pub fn from_composite(score: i32) -> Self {
        if score >= BUY_THRESHOLD {
            Signal::Buy
        } else if score <= SELL_THRESHOLD {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
        })
    }
}

/// Readings for one evaluation. Sources never set are `Missing`.
///
/// The macro composite is driven by the scenario alone; a value set for
/// [`SourceId::MacroComposite`] directly is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalInputs {
    values: BTreeMap<SourceId, SourceValue>,
    scenario: Option<MacroScenario>,
}

impl SignalInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, source: SourceId, value: SourceValue) {
        if source.is_thresholded() {
            self.values.insert(source, value);
        }
    }

    /// Builder form of [`set`](Self::set) for a plain number.
    pub fn with(mut self, source: SourceId, value: f64) -> Self {
        self.set(source, SourceValue::from_reading(value));
        self
    }

    pub fn with_value(mut self, source: SourceId, value: SourceValue) -> Self {
        self.set(source, value);
        self
    }

    pub fn with_scenario(mut self, scenario: MacroScenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    pub fn set_scenario(&mut self, scenario: Option<MacroScenario>) {
        self.scenario = scenario;
    }

    pub fn scenario(&self) -> Option<MacroScenario> {
        self.scenario
    }

    /// Reading for a source, `Missing` if never set.
    pub fn value(&self, source: SourceId) -> SourceValue {
        if source == SourceId::MacroComposite {
            return self
                .scenario
                .map(|s| SourceValue::Resolved(f64::from(s.simulate().total)))
                .unwrap_or_else(SourceValue::missing);
        }
        self.values
            .get(&source)
            .cloned()
            .unwrap_or_else(SourceValue::missing)
    }
}

/// One row of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub source: SourceId,
    pub value: SourceValue,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// One entry per source, in [`SourceId::ALL`] order.
    pub contributions: Vec<ScoreContribution>,
    pub macro_breakdown: Option<MacroBreakdown>,
    pub composite: i32,
    pub signal: Signal,
    pub fingerprint: InputFingerprint,
}

impl Evaluation {
    pub fn contribution(&self, source: SourceId) -> Option<&ScoreContribution> {
        self.contributions.iter().find(|c| c.source == source)
    }

    pub fn score_of(&self, source: SourceId) -> i32 {
        self.contribution(source).map_or(0, |c| c.score)
    }

    /// Sources that had no usable reading.
    pub fn unavailable(&self) -> impl Iterator<Item = &ScoreContribution> {
        self.contributions.iter().filter(|c| !c.value.is_resolved())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    rules: ScoringRules,
}

impl SignalEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, inputs: &SignalInputs) -> Evaluation {
        let macro_breakdown = inputs.scenario().map(MacroScenario::simulate);

        let contributions: Vec<ScoreContribution> = SourceId::ALL
            .into_iter()
            .map(|source| {
                // Non-finite readings are normalized here so the breakdown
                // never reports a NaN as resolved.
                let value = match inputs.value(source) {
                    SourceValue::Resolved(v) => SourceValue::from_reading(v),
                    other => other,
                };
                let score = self.score(source, &value, macro_breakdown.as_ref());
                ScoreContribution {
                    source,
                    value,
                    score,
                }
            })
            .collect();

        let composite = contributions.iter().map(|c| c.score).sum();
        let signal = Signal::from_composite(composite);
        let fingerprint = InputFingerprint::of(inputs);

        debug!(composite, %signal, fingerprint = %fingerprint, "evaluated composite signal");

        Evaluation {
            contributions,
            macro_breakdown,
            composite,
            signal,
            fingerprint,
        }
    }

    fn score(&self, source: SourceId, value: &SourceValue, breakdown: Option<&MacroBreakdown>) -> i32 {
        let Some(reading) = value.resolved() else {
            return 0;
        };
        if source == SourceId::MacroComposite {
            return breakdown.map_or(0, |b| b.total);
        }
        self.rules.rule(source).map_or(0, |rule| rule.score(reading))
    }
}
