//! End-to-end dashboard runs against in-memory providers and temp CSV files.

use chrono::NaiveDate;
use soxxdash_core::config::DashboardConfig;
use soxxdash_core::dashboard::{Dashboard, EvaluationRequest, Sources, SYNTHETIC_SOURCE};
use soxxdash_core::data::{DataError, MacroProvider, PriceProvider};
use soxxdash_core::domain::{Observation, PriceSeries};
use soxxdash_core::signal::{MacroScenario, Signal, SourceId, SourceValue, Unavailability};
use std::collections::HashMap;
use std::path::Path;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

/// Serves fixed series by symbol; unknown symbols fail like a dead network.
struct FixedPrices {
    series: HashMap<String, PriceSeries>,
}

impl FixedPrices {
    /// SOXX climbs one point a day; SPY is flat at 400.
    fn trending() -> Self {
        let start = as_of() - chrono::Duration::days(299);
        let soxx: Vec<f64> = (0..300).map(|i| 100.0 + i as f64).collect();
        let spy = vec![400.0; 300];
        let mut series = HashMap::new();
        series.insert("SOXX".to_string(), PriceSeries::from_closes("SOXX", start, &soxx));
        series.insert("SPY".to_string(), PriceSeries::from_closes("SPY", start, &spy));
        Self { series }
    }
}

impl PriceProvider for FixedPrices {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(&self, symbol: &str, _start: NaiveDate, _end: NaiveDate) -> Result<PriceSeries, DataError> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::NetworkUnreachable(format!("no route for {symbol}")))
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// A provider whose circuit breaker is open.
struct BlockedPrices;

impl PriceProvider for BlockedPrices {
    fn name(&self) -> &str {
        "blocked"
    }

    fn fetch(&self, symbol: &str, _start: NaiveDate, _end: NaiveDate) -> Result<PriceSeries, DataError> {
        panic!("blocked provider was asked for {symbol}");
    }

    fn is_available(&self) -> bool {
        false
    }
}

struct FixedMacro(Result<f64, fn() -> DataError>);

impl MacroProvider for FixedMacro {
    fn name(&self) -> &str {
        "fixed_macro"
    }

    fn latest(&self, _series_code: &str) -> Result<Observation, DataError> {
        match &self.0 {
            Ok(value) => Ok(Observation {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                value: *value,
            }),
            Err(make) => Err(make()),
        }
    }
}

fn missing_key() -> DataError {
    DataError::AuthenticationRequired("FRED_API_KEY is not set".into())
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

/// Config whose CSV paths all point into `dir`.
fn config_in(dir: &Path) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.commodities.dram.path = dir.join("dram_prices.csv");
    config.commodities.nand.path = dir.join("nand_flash_prices.csv");
    config.commodities.book_to_bill.path = dir.join("semi_book_to_bill.csv");
    config
}

fn write_commodities(dir: &Path) {
    write(
        dir,
        "dram_prices.csv",
        "Date,DRAM_Price\n2024-01-01,3.6\n2024-02-01,3.7\n2024-03-01,3.8\n2024-04-01,3.9\n2024-05-01,4.1\n",
    );
    write(dir, "semi_book_to_bill.csv", "Date,BookToBill\n2024-05-01,1.10\n");
}

#[test]
fn full_run_scores_every_available_source() {
    let dir = tempfile::tempdir().unwrap();
    write_commodities(dir.path());

    let prices = FixedPrices::trending();
    let macro_data = FixedMacro(Ok(25_500.0));
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let request = EvaluationRequest {
        scenario: Some(MacroScenario::Strong),
        as_of: as_of(),
        synthetic_fallback: false,
    };

    let report = dashboard.run(
        Sources {
            prices: Some(&prices),
            macro_data: Some(&macro_data),
        },
        &request,
    );
    let eval = &report.evaluation;

    assert_eq!(eval.contribution(SourceId::Rsi).unwrap().value, SourceValue::Resolved(100.0));
    assert_eq!(eval.score_of(SourceId::Rsi), 1);
    // Linear prices: both EMAs lag by a constant, so the histogram is flat at zero.
    assert_eq!(eval.score_of(SourceId::Macd), 0);
    assert_eq!(eval.score_of(SourceId::Roc3m), 1);
    assert_eq!(eval.score_of(SourceId::RelativeStrengthTrend), 1);
    assert_eq!(eval.score_of(SourceId::Capex), 1);
    assert_eq!(eval.score_of(SourceId::SemiSalesYoy), 1);
    assert_eq!(eval.score_of(SourceId::DramPrice), 1);
    assert_eq!(eval.score_of(SourceId::DramTrend), 1);
    assert_eq!(eval.score_of(SourceId::NandPrice), 0);
    assert_eq!(eval.score_of(SourceId::NandTrend), 0);
    assert_eq!(eval.score_of(SourceId::BookToBill), 1);
    assert_eq!(eval.score_of(SourceId::MacroComposite), 5);
    assert_eq!(eval.composite, 13);
    assert_eq!(eval.signal, Signal::Buy);

    assert_eq!(report.snapshot.ticker_close, Some(399.0));
    assert_eq!(report.snapshot.benchmark_close, Some(400.0));
    assert_eq!(report.snapshot.price_source.as_deref(), Some("fixed"));
    assert_eq!(report.snapshot.capex.map(|o| o.value), Some(25_500.0));
    assert!(!report.synthetic);
    // Only the NAND file is absent.
    assert_eq!(report.warnings.len(), 1, "{:?}", report.warnings);
    assert!(report.warnings[0].contains("NAND_Price"));
}

#[test]
fn missing_fred_key_is_a_warning_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_commodities(dir.path());

    let prices = FixedPrices::trending();
    let macro_data = FixedMacro(Err(missing_key));
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let report = dashboard.run(
        Sources {
            prices: Some(&prices),
            macro_data: Some(&macro_data),
        },
        &EvaluationRequest::new(as_of()),
    );

    let capex = report.evaluation.contribution(SourceId::Capex).unwrap();
    assert_eq!(capex.score, 0);
    assert!(matches!(
        capex.value,
        SourceValue::Unavailable(Unavailability::CredentialMissing { .. })
    ));
    assert!(report.warnings.iter().any(|w| w.contains("FRED_API_KEY")));
    // Everything else still scores: RSI, ROC, RS trend, semi sales, DRAM x2, B2B.
    assert_eq!(report.evaluation.composite, 7);
    assert_eq!(report.evaluation.signal, Signal::Buy);
}

#[test]
fn price_outage_only_silences_technicals() {
    let dir = tempfile::tempdir().unwrap();
    write_commodities(dir.path());

    let prices = FixedPrices {
        series: HashMap::new(),
    };
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let report = dashboard.run(
        Sources {
            prices: Some(&prices),
            macro_data: None,
        },
        &EvaluationRequest::new(as_of()),
    );
    let eval = &report.evaluation;

    for source in [SourceId::Rsi, SourceId::Macd, SourceId::Roc3m, SourceId::RelativeStrengthTrend] {
        let c = eval.contribution(source).unwrap();
        assert_eq!(c.score, 0);
        assert!(
            matches!(c.value, SourceValue::Unavailable(Unavailability::FetchFailed { .. })),
            "{source}: {:?}",
            c.value
        );
    }
    // Semi sales, DRAM level and trend, book-to-bill.
    assert_eq!(eval.composite, 4);
    assert_eq!(report.warnings.iter().filter(|w| w.contains("price history")).count(), 2);
    assert_eq!(report.snapshot.ticker_close, None);
}

#[test]
fn short_history_is_insufficient_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let start = as_of() - chrono::Duration::days(9);
    let mut series = HashMap::new();
    series.insert(
        "SOXX".to_string(),
        PriceSeries::from_closes("SOXX", start, &[100.0, 101.0, 102.0, 101.0, 103.0, 104.0, 103.5, 105.0, 106.0, 107.0]),
    );
    series.insert("SPY".to_string(), PriceSeries::from_closes("SPY", start, &[400.0; 10]));
    let prices = FixedPrices { series };

    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let report = dashboard.run(
        Sources {
            prices: Some(&prices),
            macro_data: None,
        },
        &EvaluationRequest::new(as_of()),
    );

    let rsi = report.evaluation.contribution(SourceId::Rsi).unwrap();
    assert_eq!(
        rsi.value,
        SourceValue::Unavailable(Unavailability::InsufficientHistory {
            needed: 15,
            available: 10
        })
    );
    assert_eq!(rsi.score, 0);
    // Ten points are enough for the five-point RS trend.
    assert!(report
        .evaluation
        .contribution(SourceId::RelativeStrengthTrend)
        .unwrap()
        .value
        .is_resolved());
}

#[test]
fn malformed_dram_file_does_not_touch_book_to_bill() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "dram_prices.csv", "Date,DRAM_Price\n2024-01-01,abc\n");
    write(dir.path(), "semi_book_to_bill.csv", "Date,BookToBill\n2024-05-01,0.90\n");

    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let report = dashboard.run(Sources::offline(), &EvaluationRequest::new(as_of()));
    let eval = &report.evaluation;

    assert_eq!(eval.contribution(SourceId::DramPrice).unwrap().value, SourceValue::missing());
    assert_eq!(eval.score_of(SourceId::DramPrice), 0);
    assert_eq!(eval.score_of(SourceId::BookToBill), -1);
    // Semi sales +1, book-to-bill -1.
    assert_eq!(eval.composite, 0);
    assert_eq!(eval.signal, Signal::Sell);
}

#[test]
fn synthetic_fallback_tags_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let prices = FixedPrices {
        series: HashMap::new(),
    };
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let mut request = EvaluationRequest::new(as_of());
    request.synthetic_fallback = true;

    let report = dashboard.run(
        Sources {
            prices: Some(&prices),
            macro_data: None,
        },
        &request,
    );

    assert!(report.synthetic);
    assert_eq!(report.snapshot.price_source.as_deref(), Some(SYNTHETIC_SOURCE));
    assert!(report.evaluation.contribution(SourceId::Rsi).unwrap().value.is_resolved());
    assert!(report.warnings.iter().any(|w| w.contains("synthetic")));
}

#[test]
fn identical_runs_produce_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_commodities(dir.path());
    let prices = FixedPrices::trending();
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let sources = Sources {
        prices: Some(&prices),
        macro_data: None,
    };
    let request = EvaluationRequest::new(as_of());

    let first = dashboard.run(sources, &request);
    let second = dashboard.run(sources, &request);
    assert_eq!(first, second);
}

#[test]
fn rule_overrides_flow_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.macro_data.capex_series = "NAPM".into();
    config.macro_data.semi_sales_yoy_growth = None;
    config.rules.insert(
        "capex".into(),
        soxxdash_core::signal::ThresholdRule::new(50.0, 48.0),
    );

    let macro_data = FixedMacro(Ok(51.3));
    let dashboard = Dashboard::new(config).unwrap();
    let report = dashboard.run(
        Sources {
            prices: None,
            macro_data: Some(&macro_data),
        },
        &EvaluationRequest::new(as_of()),
    );
    assert_eq!(report.evaluation.score_of(SourceId::Capex), 1);
    assert_eq!(report.evaluation.score_of(SourceId::SemiSalesYoy), 0);
    assert_eq!(report.evaluation.composite, 1);
    assert_eq!(report.evaluation.signal, Signal::Hold);
}

#[test]
fn report_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let report = dashboard.run(Sources::offline(), &EvaluationRequest::new(as_of()));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["evaluation"]["signal"], "HOLD");
    assert_eq!(json["evaluation"]["contributions"].as_array().unwrap().len(), SourceId::ALL.len());
    assert_eq!(json["as_of"], "2024-06-28");
}

#[test]
fn blocked_provider_is_skipped_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let report = dashboard.run(
        Sources {
            prices: Some(&BlockedPrices),
            macro_data: None,
        },
        &EvaluationRequest::new(as_of()),
    );

    for source in [SourceId::Rsi, SourceId::Macd, SourceId::Roc3m, SourceId::RelativeStrengthTrend] {
        assert!(matches!(
            report.evaluation.contribution(source).unwrap().value,
            SourceValue::Unavailable(Unavailability::FetchFailed { .. })
        ));
    }
    assert_eq!(
        report.warnings.iter().filter(|w| w.contains("circuit breaker open")).count(),
        2
    );
    assert_eq!(report.evaluation.composite, 1);
}

#[test]
fn blocked_provider_still_allows_synthetic_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = Dashboard::new(config_in(dir.path())).unwrap();
    let mut request = EvaluationRequest::new(as_of());
    request.synthetic_fallback = true;
    let report = dashboard.run(
        Sources {
            prices: Some(&BlockedPrices),
            macro_data: None,
        },
        &request,
    );

    assert!(report.synthetic);
    assert_eq!(report.snapshot.price_source.as_deref(), Some(SYNTHETIC_SOURCE));
}
