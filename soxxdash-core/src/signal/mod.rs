//! Signal aggregation: per-source threshold scoring into a BUY/HOLD/SELL call.
//!
//! The engine is a pure function of its inputs. It never fetches data and
//! never fails: sources without a usable reading score 0.

pub mod engine;
pub mod rules;
pub mod scenario;
pub mod source;

pub use engine::{
    Evaluation, ScoreContribution, Signal, SignalEngine, SignalInputs, BUY_THRESHOLD,
    SELL_THRESHOLD,
};
pub use rules::{RuleError, ScoringRules, ThresholdRule};
pub use scenario::{MacroBreakdown, MacroScenario, UnknownScenario, MACRO_SUB_INDICATORS};
pub use source::{SourceId, SourceValue, Unavailability, UnknownSource};
