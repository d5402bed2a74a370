//! Property tests for configuration files.
//!
//! Uses proptest to verify:
//! 1. Any valid config survives being written as TOML and read back
//! 2. An inverted cohort is rejected however it is written

use proptest::prelude::*;
use std::path::PathBuf;

use saleslab_runner::{AnalysisConfig, CohortConfig, ConfigError, DataConfig, ReportConfig};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_path() -> impl Strategy<Value = PathBuf> {
    "[a-z]{1,8}(/[a-z0-9_]{1,8}){0,2}\\.csv".prop_map(PathBuf::from)
}

fn arb_delimiter() -> impl Strategy<Value = String> {
    prop::sample::select(vec![",", ";", "\t", "|"]).prop_map(String::from)
}

fn arb_config() -> impl Strategy<Value = AnalysisConfig> {
    (
        (arb_path(), arb_path(), arb_path()),
        arb_delimiter(),
        1usize..100_000,
        (0i64..120, 0i64..60),
        1usize..20,
    )
        .prop_map(
            |((users, purchases, products), delimiter, infer_schema_rows, (min_age, span), top_n)| {
                AnalysisConfig {
                    data: DataConfig {
                        users,
                        purchases,
                        products,
                        delimiter,
                        infer_schema_rows,
                    },
                    cohort: CohortConfig {
                        min_age,
                        max_age: min_age + span,
                    },
                    report: ReportConfig { top_n },
                }
            },
        )
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn valid_config_reads_back_from_toml(config in arb_config()) {
        let text = toml::to_string(&config).unwrap();
        let parsed = AnalysisConfig::from_toml(&text).unwrap();
        prop_assert_eq!(&parsed, &config);

        let session = parsed.session_config().unwrap();
        prop_assert_eq!(session.csv.delimiter, config.data.delimiter.as_bytes()[0]);
        prop_assert_eq!(session.sources.users, config.data.users);
    }

    #[test]
    fn inverted_cohort_is_rejected(min_age in 1i64..120, gap in 1i64..60) {
        let text = format!("[cohort]\nmin_age = {}\nmax_age = {}\n", min_age, min_age - gap);
        let err = AnalysisConfig::from_toml(&text).unwrap_err();
        prop_assert!(matches!(err, ConfigError::Cohort(_)));
    }
}
