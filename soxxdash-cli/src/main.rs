//! SOXX dashboard CLI: evaluate and render the composite momentum signal.
//!
//! Commands:
//! - `evaluate`: fetch prices and macro data, score every source, print the signal
//! - `config`: print the default configuration as TOML

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use soxxdash_core::data::{CircuitBreaker, FredClient, YahooProvider};
use soxxdash_core::signal::{ScoreContribution, SourceValue};
use soxxdash_core::{
    Dashboard, DashboardConfig, DashboardReport, EvaluationRequest, MacroScenario, Sources,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "soxxdash",
    about = "SOXX momentum dashboard, composite BUY/HOLD/SELL signal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every source and print the composite signal.
    Evaluate {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Simulated macro regime: strong, neutral or weak.
        #[arg(long, default_value_t = MacroScenario::Neutral)]
        scenario: MacroScenario,

        /// Skip all network sources.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic prices when a price fetch fails.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Last day of the price window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,soxxdash=info,soxxdash_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            config,
            scenario,
            offline,
            synthetic,
            json,
            as_of,
        } => run_evaluate(config, scenario, offline, synthetic, json, as_of),
        Commands::Config => {
            print!("{}", DashboardConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn run_evaluate(
    config_path: Option<PathBuf>,
    scenario: MacroScenario,
    offline: bool,
    synthetic: bool,
    json: bool,
    as_of: Option<String>,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };

    let as_of = as_of
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--as-of must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let fred_key = resolve_fred_key(
        std::env::var("FRED_API_KEY").ok(),
        config.macro_data.fred_api_key.clone(),
    );

    let timeout = config.market.request_timeout();
    let yahoo = YahooProvider::new(Arc::new(CircuitBreaker::for_provider("yahoo_finance")), timeout)?;
    let fred = FredClient::new(fred_key, timeout, Arc::new(CircuitBreaker::for_provider("fred")))?;

    let sources = if offline {
        info!("offline mode: network sources skipped");
        Sources::offline()
    } else {
        Sources {
            prices: Some(&yahoo),
            macro_data: Some(&fred),
        }
    };

    let request = EvaluationRequest {
        scenario: Some(scenario),
        as_of,
        synthetic_fallback: synthetic,
    };

    let dashboard = Dashboard::new(config)?;
    let report = dashboard.run(sources, &request);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DashboardReport) {
    let eval = &report.evaluation;
    let snap = &report.snapshot;

    println!();
    println!("=== {} Momentum Dashboard ===", snap.ticker);
    println!("As of:          {}", report.as_of);
    if let Some(close) = snap.ticker_close {
        println!("{:<16}{close:.2}", format!("{} close:", snap.ticker));
    }
    if let Some(close) = snap.benchmark_close {
        println!("{:<16}{close:.2}", format!("{} close:", snap.benchmark));
    }
    if let Some(rs) = snap.relative_strength {
        println!("Rel. strength:  {rs:.4}");
    }
    if let Some(capex) = &snap.capex {
        println!("CapEx proxy:    {:.2} ({})", capex.value, capex.date);
    }

    println!();
    println!("--- Breakdown ---");
    for c in &eval.contributions {
        println!(
            "{:<26}{:>14}  {:>+3}  {}",
            c.source.label(),
            format_value(c),
            c.score,
            score_bar(c.score)
        );
    }

    if let Some(breakdown) = &eval.macro_breakdown {
        println!();
        println!("--- Macro composite ({}) ---", breakdown.scenario);
        for (name, score) in &breakdown.indicators {
            println!("  {name:<24}{score:>+3}");
        }
    }

    println!();
    println!("Composite:      {:+}", eval.composite);
    println!("Signal:         {}", eval.signal);
    println!("Fingerprint:    {}", eval.fingerprint.short());

    if report.synthetic {
        println!();
        println!("WARNING: Signal based on SYNTHETIC price data");
    }
    let unavailable: Vec<String> = eval
        .unavailable()
        .filter_map(|c| match &c.value {
            SourceValue::Unavailable(reason) => Some(format!("{}: {reason}", c.source.label())),
            SourceValue::Resolved(_) => None,
        })
        .collect();
    if !unavailable.is_empty() {
        println!();
        println!("Unavailable sources (scored 0):");
        for line in unavailable {
            println!("  {line}");
        }
    }
    for warn in &report.warnings {
        println!("WARNING: {warn}");
    }
}

fn format_value(c: &ScoreContribution) -> String {
    match c.value.resolved() {
        Some(v) if v.abs() >= 1000.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.4}"),
        None => "n/a".to_string(),
    }
}

/// `FRED_API_KEY` from the environment overrides `[macro] fred_api_key`.
/// A blank value counts as unset.
fn resolve_fred_key(env: Option<String>, configured: Option<String>) -> Option<String> {
    let present = |k: &String| !k.trim().is_empty();
    env.filter(present).or(configured.filter(present))
}

/// `▲▲▲` for positive scores, `▼▼` for negative, `·` for zero.
fn score_bar(score: i32) -> String {
    match score {
        0 => "·".to_string(),
        s if s > 0 => "▲".repeat(s as usize),
        s => "▼".repeat(s.unsigned_abs() as usize),
    }
}
