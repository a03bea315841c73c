//! SOXX Dashboard Core: indicators, data adapters and the composite signal engine.
//!
//! This crate contains everything behind the dashboard's single evaluation pass:
//! - Domain types (price series, dated observations)
//! - Indicator library (RSI, MACD histogram, ROC, relative strength)
//! - Data adapters (Yahoo price history, FRED macro proxies, local CSV series)
//! - Signal aggregation engine with per-source fault isolation
//! - Dashboard orchestration that wires adapters into the engine
//!
//! Nothing here keeps state between evaluations. Every run rebuilds its inputs
//! from the adapters and discards them once the report is rendered.

pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod signal;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardReport, EvaluationRequest, Sources};
pub use signal::{Evaluation, MacroScenario, Signal, SignalEngine, SignalInputs, SourceId, SourceValue};
