//! Signal sources and their readings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One scored input of the composite signal.
///
/// Declaration order is the display order of the breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Rsi,
    Macd,
    Roc3m,
    RelativeStrengthTrend,
    Capex,
    SemiSalesYoy,
    DramPrice,
    DramTrend,
    NandPrice,
    NandTrend,
    BookToBill,
    MacroComposite,
}

impl SourceId {
    pub const ALL: [SourceId; 12] = [
        SourceId::Rsi,
        SourceId::Macd,
        SourceId::Roc3m,
        SourceId::RelativeStrengthTrend,
        SourceId::Capex,
        SourceId::SemiSalesYoy,
        SourceId::DramPrice,
        SourceId::DramTrend,
        SourceId::NandPrice,
        SourceId::NandTrend,
        SourceId::BookToBill,
        SourceId::MacroComposite,
    ];

    /// Stable key used in config files and JSON.
    pub fn key(self) -> &'static str {
        match self {
            SourceId::Rsi => "rsi",
            SourceId::Macd => "macd",
            SourceId::Roc3m => "roc_3m",
            SourceId::RelativeStrengthTrend => "relative_strength_trend",
            SourceId::Capex => "capex",
            SourceId::SemiSalesYoy => "semi_sales_yoy",
            SourceId::DramPrice => "dram_price",
            SourceId::DramTrend => "dram_trend",
            SourceId::NandPrice => "nand_price",
            SourceId::NandTrend => "nand_trend",
            SourceId::BookToBill => "book_to_bill",
            SourceId::MacroComposite => "macro_composite",
        }
    }

    /// Human-readable label for the breakdown table.
    pub fn label(self) -> &'static str {
        match self {
            SourceId::Rsi => "RSI",
            SourceId::Macd => "MACD Histogram",
            SourceId::Roc3m => "ROC 3M",
            SourceId::RelativeStrengthTrend => "Relative Strength Trend",
            SourceId::Capex => "Tech Orders / CapEx",
            SourceId::SemiSalesYoy => "Semi Sales YoY",
            SourceId::DramPrice => "DRAM Price",
            SourceId::DramTrend => "DRAM Trend",
            SourceId::NandPrice => "NAND Price",
            SourceId::NandTrend => "NAND Trend",
            SourceId::BookToBill => "Book-to-Bill",
            SourceId::MacroComposite => "Macro Composite",
        }
    }

    /// Scored by a threshold rule (everything except the macro composite).
    pub fn is_thresholded(self) -> bool {
        self != SourceId::MacroComposite
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signal source {0:?}")]
pub struct UnknownSource(pub String);

impl FromStr for SourceId {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        SourceId::ALL
            .into_iter()
            .find(|id| id.key() == key)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// Why a source has no usable reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Unavailability {
    /// No adapter or value was supplied.
    Missing,
    /// The series was shorter than the indicator's lookback.
    InsufficientHistory { needed: usize, available: usize },
    /// The adapter call failed.
    FetchFailed { reason: String },
    /// The adapter needs a credential that was not configured.
    CredentialMissing { reason: String },
    /// The reading was NaN or infinite.
    NonFinite,
}

impl fmt::Display for Unavailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailability::Missing => f.write_str("no data"),
            Unavailability::InsufficientHistory { needed, available } => {
                write!(f, "insufficient history ({available}/{needed} points)")
            }
            Unavailability::FetchFailed { reason } => write!(f, "fetch failed: {reason}"),
            Unavailability::CredentialMissing { reason } => write!(f, "credential missing: {reason}"),
            Unavailability::NonFinite => f.write_str("undefined"),
        }
    }
}

/// A source's reading: a number, or the reason there isn't one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceValue {
    Resolved(f64),
    Unavailable(Unavailability),
}

impl SourceValue {
    pub fn missing() -> Self {
        SourceValue::Unavailable(Unavailability::Missing)
    }

    /// `Resolved` for finite numbers, `Unavailable(NonFinite)` otherwise.
    pub fn from_reading(value: f64) -> Self {
        if value.is_finite() {
            SourceValue::Resolved(value)
        } else {
            SourceValue::Unavailable(Unavailability::NonFinite)
        }
    }

    /// `None` becomes `Missing`.
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or_else(Self::missing, Self::from_reading)
    }

    /// Finite resolved value, if any.
    pub fn resolved(&self) -> Option<f64> {
        match self {
            SourceValue::Resolved(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved().is_some()
    }
}

impl fmt::Display for SourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceValue::Resolved(v) => write!(f, "{v:.4}"),
            SourceValue::Unavailable(reason) => write!(f, "n/a ({reason})"),
        }
    }
}
