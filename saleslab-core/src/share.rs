//! Category shares of cohort revenue and top-N ranking.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A category's revenue and its percentage of the cohort's revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total_sales: f64,
    pub percentage: f64,
}

impl CategoryShare {
    pub fn from_frame(frame: &DataFrame) -> PolarsResult<Vec<Self>> {
        let categories = frame.column("category")?.str()?;
        let totals = frame.column("total_sales")?.f64()?;
        let percentages = frame.column("percentage")?.f64()?;

        Ok(categories
            .into_iter()
            .zip(totals)
            .zip(percentages)
            .filter_map(|((category, total), percentage)| {
                Some(CategoryShare {
                    category: category?.to_string(),
                    total_sales: total?,
                    percentage: percentage?,
                })
            })
            .collect())
    }
}

/// Why shares could not be computed for a cohort.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("no purchases in this cohort")]
    EmptyCohort,

    #[error("cohort revenue sums to zero")]
    ZeroRevenue,

    #[error(transparent)]
    Engine(#[from] PolarsError),
}

impl ShareError {
    /// True for the cohort conditions that are reported rather than fatal.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ShareError::EmptyCohort | ShareError::ZeroRevenue)
    }
}

/// Extend category totals with `percentage = round(total / Σtotal × 100, 2)`.
///
/// The grand total is taken over the already-rounded category totals.
pub fn category_shares(totals: &DataFrame) -> Result<DataFrame, ShareError> {
    if totals.height() == 0 {
        return Err(ShareError::EmptyCohort);
    }

    let grand_total = totals.column("total_sales")?.f64()?.sum().unwrap_or(0.0);
    if grand_total == 0.0 {
        return Err(ShareError::ZeroRevenue);
    }

    let shares = totals
        .clone()
        .lazy()
        .with_column(
            (col("total_sales") / lit(grand_total) * lit(100.0))
                .round(2)
                .alias("percentage"),
        )
        .collect()?;
    Ok(shares)
}

/// The `n` largest shares, percentage descending, ties by category ascending.
pub fn top_categories(shares: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
    shares
        .clone()
        .lazy()
        .sort(
            ["percentage", "category"],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_maintain_order(true),
        )
        .limit(n as IdxSize)
        .collect()
}
