//! SalesLab CLI: run the category sales analysis and print the report.
//!
//! With no arguments, reads `data/users.csv`, `data/purchases.csv` and
//! `data/products.csv` and prints the text report for ages 18-25.
//!
//! Options:
//! - `--config`: TOML file with data paths, cohort bounds and top-N
//! - `--data-dir`: directory holding the three default file names
//! - `--format text|json`
//! - `--no-color`, `-v`/`-vv`

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use saleslab_runner::{run_analysis, AnalysisConfig, TextStyle};

#[derive(Parser)]
#[command(
    name = "saleslab",
    about = "SalesLab CLI: category sales and cohort shares from users, purchases and products"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing users.csv, purchases.csv and products.csv.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Disable ANSI colours in the text report.
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    debug!(?config, "resolved config");

    let report = run_analysis(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Text => {
            let style = TextStyle {
                color: !cli.no_color && stdout.is_terminal(),
            };
            report
                .render_text(&mut out, style)
                .context("failed to write report")?;
        }
        Format::Json => report
            .render_json(&mut out)
            .context("failed to write report")?,
    }

    Ok(())
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .init();
}
