//! Dashboard configuration, loaded from TOML.
//!
//! Every section has `#[serde(default)]`, so a file only needs the keys it
//! changes. An empty file is the default configuration.
//!
//! ```toml
//! [market]
//! ticker = "SOXX"
//!
//! [macro]
//! capex_series = "NAPM"
//!
//! [rules.capex]
//! upper = 50.0
//! lower = 48.0
//! ```

use crate::signal::{RuleError, ScoringRules, SourceId, ThresholdRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<RuleError> for ConfigError {
    fn from(e: RuleError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

/// Upper bound on `lookback_days` (about a century of history).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub ticker: String,
    pub benchmark: String,
    /// Calendar days of price history to request.
    pub lookback_days: u32,
    pub request_timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            ticker: "SOXX".into(),
            benchmark: "SPY".into(),
            lookback_days: 365,
            request_timeout_secs: 30,
        }
    }
}

impl MarketConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub roc_period: usize,
    /// Points in the trailing window for relative-strength and commodity trends.
    pub trend_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            roc_period: 63,
            trend_window: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
    /// FRED series used as the capex proxy.
    pub capex_series: String,
    /// Used when the `FRED_API_KEY` environment variable is unset.
    pub fred_api_key: Option<String>,
    /// Semiconductor sales growth, percent year over year.
    pub semi_sales_yoy_growth: Option<f64>,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            capex_series: "NEWORDER".into(),
            fred_api_key: None,
            semi_sales_yoy_growth: Some(6.5),
        }
    }
}

/// Path and value column of one local CSV series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvSeriesConfig {
    pub path: PathBuf,
    pub column: String,
}

impl CsvSeriesConfig {
    fn new(path: &str, column: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            column: column.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommodityConfig {
    pub dram: CsvSeriesConfig,
    pub nand: CsvSeriesConfig,
    pub book_to_bill: CsvSeriesConfig,
}

impl Default for CommodityConfig {
    fn default() -> Self {
        Self {
            dram: CsvSeriesConfig::new("data/dram_prices.csv", "DRAM_Price"),
            nand: CsvSeriesConfig::new("data/nand_flash_prices.csv", "NAND_Price"),
            book_to_bill: CsvSeriesConfig::new("data/semi_book_to_bill.csv", "BookToBill"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub market: MarketConfig,
    pub indicators: IndicatorConfig,
    #[serde(rename = "macro")]
    pub macro_data: MacroConfig,
    pub commodities: CommodityConfig,
    /// Threshold overrides keyed by source (`rsi`, `capex`, ...).
    pub rules: BTreeMap<String, ThresholdRule>,
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.ticker.trim().is_empty() || self.market.benchmark.trim().is_empty() {
            return Err(ConfigError::Invalid("ticker and benchmark must be non-empty".into()));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.market.lookback_days) {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }

        let ind = &self.indicators;
        if ind.rsi_window == 0 || ind.roc_period == 0 {
            return Err(ConfigError::Invalid("rsi_window and roc_period must be at least 1".into()));
        }
        if ind.macd_fast == 0 || ind.macd_signal == 0 || ind.macd_slow <= ind.macd_fast {
            return Err(ConfigError::Invalid(format!(
                "MACD periods must satisfy 0 < fast < slow and signal > 0 (got {}/{}/{})",
                ind.macd_fast, ind.macd_slow, ind.macd_signal
            )));
        }
        if ind.trend_window < 2 {
            return Err(ConfigError::Invalid("trend_window must be at least 2".into()));
        }

        if self.macro_data.capex_series.trim().is_empty() {
            return Err(ConfigError::Invalid("capex_series must be non-empty".into()));
        }
        if let Some(g) = self.macro_data.semi_sales_yoy_growth {
            if !g.is_finite() {
                return Err(ConfigError::Invalid("semi_sales_yoy_growth must be finite".into()));
            }
        }

        self.scoring_rules().map(|_| ())
    }

    /// Default rules with the `[rules]` overrides applied.
    pub fn scoring_rules(&self) -> Result<ScoringRules, ConfigError> {
        let mut rules = ScoringRules::default();
        for (name, rule) in &self.rules {
            let source: SourceId = name
                .parse()
                .map_err(|e: crate::signal::UnknownSource| ConfigError::Invalid(e.to_string()))?;
            rules = rules.with_rule(source, *rule)?;
        }
        Ok(rules)
    }
}
