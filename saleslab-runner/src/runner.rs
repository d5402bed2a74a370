//! Analysis runner: wires session, loading, cleaning, aggregation and shares
//! into an [`AnalysisReport`].
//!
//! Two entry points:
//! - `run_analysis()`: opens a session from an `AnalysisConfig`. Used by CLI.
//! - `analyze()`: runs every step against an already-open session.

use std::time::Instant;

use polars::prelude::PolarsError;
use thiserror::Error;
use tracing::{debug, info, warn};

use saleslab_core::{
    category_shares, category_totals, clean, enrich, top_categories, AgeCohort, CategoryShare,
    CategoryTotal, CleanedRelation, LoadError, Relation, Session, ShareError,
};

use crate::config::{AnalysisConfig, ConfigError};
use crate::report::{AnalysisReport, CohortShares, RowCounts};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] PolarsError),
    #[error("share error: {0}")]
    Share(#[from] ShareError),
}

/// Run the full analysis described by `config`.
///
/// The session is dropped on every return path, including load failures.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let cohort = config.cohort()?;
    let session = Session::open(config.session_config()?);
    analyze(&session, &cohort, config.report.top_n)
}

pub fn analyze(
    session: &Session,
    cohort: &AgeCohort,
    top_n: usize,
) -> Result<AnalysisReport, RunError> {
    let started = Instant::now();

    // Loads fail fast: the first unreadable relation ends the run.
    let users = clean(session.load(Relation::Users)?)?;
    let purchases = clean(session.load(Relation::Purchases)?)?;
    let products = clean(session.load(Relation::Products)?)?;
    let row_counts = [&users, &purchases, &products].map(row_counts).to_vec();

    let enriched = enrich(&purchases.frame, &products.frame, &users.frame);

    let totals_frame = category_totals(enriched.clone(), None).collect()?;
    let cohort_frame = category_totals(enriched, Some(cohort)).collect()?;
    let totals = CategoryTotal::from_frame(&totals_frame)?;
    let cohort_totals = CategoryTotal::from_frame(&cohort_frame)?;
    debug!(
        categories = totals.len(),
        cohort_categories = cohort_totals.len(),
        "aggregated"
    );

    let shares = match category_shares(&cohort_frame) {
        Ok(shares_frame) => {
            let top_frame = top_categories(&shares_frame, top_n)?;
            CohortShares::Computed {
                shares: CategoryShare::from_frame(&shares_frame)?,
                top: CategoryShare::from_frame(&top_frame)?,
            }
        }
        Err(no_data) if no_data.is_no_data() => {
            warn!(cohort = %cohort, reason = %no_data, "no data for cohort");
            CohortShares::NoData {
                reason: no_data.to_string(),
            }
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis complete"
    );

    Ok(AnalysisReport {
        cohort: *cohort,
        top_n,
        row_counts,
        totals,
        cohort_totals,
        shares,
    })
}

fn row_counts(cleaned: &CleanedRelation) -> RowCounts {
    RowCounts {
        relation: cleaned.relation,
        before: cleaned.rows_before,
        after: cleaned.rows_after(),
    }
}
