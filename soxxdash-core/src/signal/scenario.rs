//! Simulated macro composite.
//!
//! There is no live feed for the semiconductor macro regime, so the user picks
//! a scenario and each sub-indicator takes the same mock score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sub-indicators of the simulated macro composite, in display order.
pub const MACRO_SUB_INDICATORS: [&str; 5] = [
    "Global PMI",
    "Tech CapEx",
    "Book-to-Bill",
    "DRAM Prices",
    "Chip Exports (SK/TW)",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroScenario {
    Strong,
    #[default]
    Neutral,
    Weak,
}

impl MacroScenario {
    /// Score each sub-indicator takes under this scenario.
    pub fn sub_score(self) -> i32 {
        match self {
            MacroScenario::Strong => 1,
            MacroScenario::Neutral => 0,
            MacroScenario::Weak => -1,
        }
    }

    pub fn simulate(self) -> MacroBreakdown {
        let indicators: Vec<(String, i32)> = MACRO_SUB_INDICATORS
            .iter()
            .map(|name| (name.to_string(), self.sub_score()))
            .collect();
        let total = indicators.iter().map(|(_, s)| s).sum();
        MacroBreakdown {
            scenario: self,
            indicators,
            total,
        }
    }
}

impl fmt::Display for MacroScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MacroScenario::Strong => "strong",
            MacroScenario::Neutral => "neutral",
            MacroScenario::Weak => "weak",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown macro scenario {0:?} (expected strong, neutral or weak)")]
pub struct UnknownScenario(pub String);

impl FromStr for MacroScenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(MacroScenario::Strong),
            "neutral" => Ok(MacroScenario::Neutral),
            "weak" => Ok(MacroScenario::Weak),
            _ => Err(UnknownScenario(s.to_string())),
        }
    }
}

/// Per-sub-indicator scores and their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub scenario: MacroScenario,
    pub indicators: Vec<(String, i32)>,
    pub total: i32,
}
