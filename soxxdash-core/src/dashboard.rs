//! Dashboard orchestration: adapters in, one scored evaluation out.
//!
//! Each source is resolved on its own. A failed fetch, a missing credential or
//! a short series turns into an unavailable reading plus, where the user can
//! act on it, a warning in the report. Nothing here aborts the evaluation.

use crate::config::DashboardConfig;
use crate::data::{load_csv_series, synthetic_series, DataError, MacroProvider, PriceProvider};
use crate::domain::{Observation, ObservationSeries, PriceSeries};
use crate::indicators::{
    latest_defined, relative_strength, round_to, trailing_mean_change, Indicator, MacdHistogram,
    Roc, Rsi,
};
use crate::signal::{
    Evaluation, MacroScenario, ScoringRules, SignalEngine, SignalInputs, SourceId, SourceValue,
    Unavailability,
};
use crate::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Decimal places technical readings are rounded to before scoring.
const TECHNICAL_PRECISION: u32 = 2;

/// `price_source` of a series produced by the synthetic fallback.
pub const SYNTHETIC_SOURCE: &str = "synthetic";

/// Adapters available to one run. `None` means the source is not consulted
/// (offline mode); its readings become `Missing`.
#[derive(Clone, Copy, Default)]
pub struct Sources<'a> {
    pub prices: Option<&'a dyn PriceProvider>,
    pub macro_data: Option<&'a dyn MacroProvider>,
}

impl<'a> Sources<'a> {
    pub fn offline() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub scenario: Option<MacroScenario>,
    /// Last day of the price window.
    pub as_of: NaiveDate,
    /// Substitute a deterministic synthetic walk when a price fetch fails.
    pub synthetic_fallback: bool,
}

impl EvaluationRequest {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            scenario: Some(MacroScenario::Neutral),
            as_of,
            synthetic_fallback: false,
        }
    }
}

/// Latest raw market readings behind the scored breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub benchmark: String,
    pub ticker_close: Option<f64>,
    pub benchmark_close: Option<f64>,
    pub ticker_points: usize,
    pub relative_strength: Option<f64>,
    /// Provider the ticker's prices came from (`synthetic` for the fallback).
    pub price_source: Option<String>,
    pub capex: Option<Observation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub as_of: NaiveDate,
    pub evaluation: Evaluation,
    pub snapshot: MarketSnapshot,
    /// Configuration and data problems the user can act on.
    pub warnings: Vec<String>,
    /// True when any price series came from the synthetic fallback.
    pub synthetic: bool,
}

pub struct Dashboard {
    config: DashboardConfig,
    engine: SignalEngine,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules: ScoringRules = config.scoring_rules()?;
        Ok(Self {
            config,
            engine: SignalEngine::new(rules),
        })
    }

    pub fn run(&self, sources: Sources<'_>, request: &EvaluationRequest) -> DashboardReport {
        let mut run = Run::default();
        let market = &self.config.market;
        let window_start = request
            .as_of
            .checked_sub_signed(chrono::Duration::days(i64::from(market.lookback_days)));

        let (ticker, benchmark) = match window_start {
            Some(start) => (
                run.load_prices(sources.prices, &market.ticker, start, request),
                run.load_prices(sources.prices, &market.benchmark, start, request),
            ),
            None => {
                let reason = format!(
                    "a {}-day window before {} is out of calendar range",
                    market.lookback_days, request.as_of
                );
                warn!(%reason, "price history skipped");
                run.warn(format!("price history unavailable: {reason}"));
                let unavailable = Unavailability::FetchFailed { reason };
                (Err(unavailable.clone()), Err(unavailable))
            }
        };

        let mut inputs = SignalInputs::new();
        self.technical_readings(&ticker, &mut inputs);
        let rs = self.relative_strength_reading(&ticker, &benchmark, &mut inputs);

        let capex = run.capex_reading(sources.macro_data, &self.config.macro_data.capex_series);
        let capex_value = match &capex {
            Ok(obs) => SourceValue::from_reading(obs.value),
            Err(unavailable) => unavailable.clone(),
        };
        inputs.set(SourceId::Capex, capex_value);
        inputs.set(
            SourceId::SemiSalesYoy,
            SourceValue::from_option(self.config.macro_data.semi_sales_yoy_growth),
        );

        self.commodity_readings(&mut run, &mut inputs);
        inputs.set_scenario(request.scenario);

        let evaluation = self.engine.evaluate(&inputs);
        info!(
            composite = evaluation.composite,
            signal = %evaluation.signal,
            unavailable = evaluation.unavailable().count(),
            "dashboard evaluation complete"
        );

        let snapshot = MarketSnapshot {
            ticker: market.ticker.clone(),
            benchmark: market.benchmark.clone(),
            ticker_close: ticker.as_ref().ok().and_then(|(s, _)| s.last()).map(|p| p.close),
            benchmark_close: benchmark
                .as_ref()
                .ok()
                .and_then(|(s, _)| s.last())
                .map(|p| p.close),
            ticker_points: ticker.as_ref().map_or(0, |(s, _)| s.len()),
            relative_strength: rs,
            price_source: ticker.as_ref().ok().map(|(_, src)| src.clone()),
            capex: capex.ok(),
        };

        DashboardReport {
            as_of: request.as_of,
            evaluation,
            snapshot,
            warnings: run.warnings,
            synthetic: run.synthetic,
        }
    }

    /// RSI, MACD histogram and ROC from the ticker's closes.
    fn technical_readings(
        &self,
        ticker: &Result<(PriceSeries, String), Unavailability>,
        inputs: &mut SignalInputs,
    ) {
        let ind = &self.config.indicators;
        let rsi = Rsi::new(ind.rsi_window);
        let macd = MacdHistogram::new(ind.macd_fast, ind.macd_slow, ind.macd_signal);
        let roc = Roc::new(ind.roc_period);
        let technicals: [(SourceId, &dyn Indicator); 3] = [
            (SourceId::Rsi, &rsi),
            (SourceId::Macd, &macd),
            (SourceId::Roc3m, &roc),
        ];

        for (source, indicator) in technicals {
            let value = match ticker {
                Ok((series, _)) => indicator_reading(indicator, series),
                Err(reason) => SourceValue::Unavailable(reason.clone()),
            };
            inputs.set(source, value);
        }
    }

    /// Trend of the ticker/benchmark ratio. Returns the latest ratio for the snapshot.
    fn relative_strength_reading(
        &self,
        ticker: &Result<(PriceSeries, String), Unavailability>,
        benchmark: &Result<(PriceSeries, String), Unavailability>,
        inputs: &mut SignalInputs,
    ) -> Option<f64> {
        let (asset, bench) = match (ticker, benchmark) {
            (Ok((a, _)), Ok((b, _))) => (a, b),
            (Err(reason), _) | (_, Err(reason)) => {
                inputs.set(
                    SourceId::RelativeStrengthTrend,
                    SourceValue::Unavailable(reason.clone()),
                );
                return None;
            }
        };

        let ratio = relative_strength(asset, bench).values();
        inputs.set(
            SourceId::RelativeStrengthTrend,
            trend_reading(&ratio, self.config.indicators.trend_window),
        );
        latest_defined(&ratio)
    }

    fn commodity_readings(&self, run: &mut Run, inputs: &mut SignalInputs) {
        let window = self.config.indicators.trend_window;
        let commodities = &self.config.commodities;
        let series_configs = [
            (&commodities.dram, Some(SourceId::DramPrice), Some(SourceId::DramTrend)),
            (&commodities.nand, Some(SourceId::NandPrice), Some(SourceId::NandTrend)),
            (&commodities.book_to_bill, Some(SourceId::BookToBill), None),
        ];

        for (csv, level_source, trend_source) in series_configs {
            let series = load_csv_series(&csv.path, &csv.column);
            if series.is_empty() {
                run.warn(format!(
                    "{} series unavailable ({})",
                    csv.column,
                    csv.path.display()
                ));
            }
            if let Some(source) = level_source {
                inputs.set(source, level_reading(&series));
            }
            if let Some(source) = trend_source {
                let value = if series.is_empty() {
                    SourceValue::missing()
                } else {
                    trend_reading(&series.values(), window)
                };
                inputs.set(source, value);
            }
        }
    }
}

/// Per-run mutable state: collected warnings and the synthetic flag.
#[derive(Default)]
struct Run {
    warnings: Vec<String>,
    synthetic: bool,
}

impl Run {
    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn load_prices(
        &mut self,
        provider: Option<&dyn PriceProvider>,
        symbol: &str,
        start: NaiveDate,
        request: &EvaluationRequest,
    ) -> Result<(PriceSeries, String), Unavailability> {
        let failure = match provider {
            Some(provider) if !provider.is_available() => {
                warn!(symbol, provider = provider.name(), "provider is refusing requests");
                let reason = format!("{} is blocked (circuit breaker open)", provider.name());
                self.warn(format!("price history for {symbol} skipped: {reason}"));
                Unavailability::FetchFailed { reason }
            }
            Some(provider) => match provider.fetch(symbol, start, request.as_of) {
                Ok(series) if !series.is_empty() => {
                    debug!(symbol, points = series.len(), provider = provider.name(), "price history loaded");
                    return Ok((series, provider.name().to_string()));
                }
                Ok(_) => {
                    let reason = format!("{} returned no prices for {symbol}", provider.name());
                    self.warn(reason.clone());
                    Unavailability::FetchFailed { reason }
                }
                Err(e) => {
                    warn!(symbol, provider = provider.name(), error = %e, "price fetch failed");
                    self.warn(format!("price history for {symbol} unavailable: {e}"));
                    Unavailability::FetchFailed {
                        reason: e.to_string(),
                    }
                }
            },
            None => Unavailability::Missing,
        };

        if request.synthetic_fallback {
            let series = synthetic_series(symbol, start, request.as_of);
            if !series.is_empty() {
                warn!(symbol, "using synthetic price history");
                self.synthetic = true;
                self.warn(format!("{symbol}: using synthetic prices, signal is illustrative only"));
                return Ok((series, SYNTHETIC_SOURCE.to_string()));
            }
        }
        Err(failure)
    }

    /// Latest capex observation, or the reason it is unavailable.
    fn capex_reading(
        &mut self,
        provider: Option<&dyn MacroProvider>,
        series_code: &str,
    ) -> Result<Observation, SourceValue> {
        let Some(provider) = provider else {
            return Err(SourceValue::missing());
        };
        match provider.latest(series_code) {
            Ok(obs) => {
                debug!(series = series_code, value = obs.value, date = %obs.date, "capex proxy loaded");
                Ok(obs)
            }
            Err(e) => Err(SourceValue::Unavailable(self.macro_failure(series_code, &e))),
        }
    }

    fn macro_failure(&mut self, series_code: &str, e: &DataError) -> Unavailability {
        if e.is_credential_failure() {
            warn!(series = series_code, error = %e, "macro source needs a credential");
            self.warn(format!(
                "{series_code}: set FRED_API_KEY (environment or [macro] fred_api_key) to enable the capex proxy"
            ));
            Unavailability::CredentialMissing {
                reason: e.to_string(),
            }
        } else {
            warn!(series = series_code, error = %e, "macro fetch failed");
            self.warn(format!("{series_code} unavailable: {e}"));
            Unavailability::FetchFailed {
                reason: e.to_string(),
            }
        }
    }
}

/// Latest defined value of an indicator, rounded for display and scoring.
fn indicator_reading(indicator: &dyn Indicator, series: &PriceSeries) -> SourceValue {
    let needed = indicator.lookback() + 1;
    if series.len() < needed {
        debug!(indicator = indicator.name(), needed, available = series.len(), "insufficient history");
        return SourceValue::Unavailable(Unavailability::InsufficientHistory {
            needed,
            available: series.len(),
        });
    }
    match latest_defined(&indicator.compute(series)) {
        Some(v) => SourceValue::Resolved(round_to(v, TECHNICAL_PRECISION)),
        None => SourceValue::Unavailable(Unavailability::NonFinite),
    }
}

fn trend_reading(values: &[f64], window: usize) -> SourceValue {
    match trailing_mean_change(values, window) {
        Some(trend) => SourceValue::from_reading(trend),
        None => SourceValue::Unavailable(Unavailability::InsufficientHistory {
            needed: window,
            available: values.iter().filter(|v| v.is_finite()).count(),
        }),
    }
}

/// Most recent row of a level series. A blank latest cell is undefined.
fn level_reading(series: &ObservationSeries) -> SourceValue {
    SourceValue::from_option(series.latest())
}
