//! SalesLab Runner: analysis orchestration, configuration and reporting.
//!
//! This crate builds on `saleslab-core` to provide:
//! - TOML configuration with defaults matching the fixed data layout
//! - Single-pass analysis runner producing an `AnalysisReport`
//! - Text (bordered tables, optional colour) and JSON report renderers

pub mod config;
pub mod report;
pub mod runner;

pub use config::{AnalysisConfig, CohortConfig, ConfigError, DataConfig, ReportConfig};
pub use report::{AnalysisReport, CohortShares, RowCounts, TextStyle};
pub use runner::{analyze, run_analysis, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn analysis_report_is_send_sync() {
        assert_send::<AnalysisReport>();
        assert_sync::<AnalysisReport>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
    }
}
