//! Joins and per-category revenue aggregation.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive age bounds selecting a cohort of purchasing users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCohort {
    pub min_age: i64,
    pub max_age: i64,
}

impl AgeCohort {
    pub fn new(min_age: i64, max_age: i64) -> Result<Self, CohortError> {
        if min_age > max_age {
            return Err(CohortError::InvertedBounds { min_age, max_age });
        }
        Ok(Self { min_age, max_age })
    }

    pub fn contains(&self, age: i64) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }

    /// Row predicate on the `age` column.
    pub fn predicate(&self) -> Expr {
        col("age")
            .gt_eq(lit(self.min_age))
            .and(col("age").lt_eq(lit(self.max_age)))
    }
}

impl Default for AgeCohort {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 25,
        }
    }
}

impl fmt::Display for AgeCohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min_age, self.max_age)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CohortError {
    #[error("cohort minimum age {min_age} is above maximum age {max_age}")]
    InvertedBounds { min_age: i64, max_age: i64 },
}

/// Revenue of one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_sales: f64,
}

impl CategoryTotal {
    /// Read rows out of a `category`/`total_sales` frame.
    pub fn from_frame(frame: &DataFrame) -> PolarsResult<Vec<Self>> {
        let categories = frame.column("category")?.str()?;
        let totals = frame.column("total_sales")?.f64()?;

        Ok(categories
            .into_iter()
            .zip(totals)
            .filter_map(|(category, total)| {
                Some(CategoryTotal {
                    category: category?.to_string(),
                    total_sales: total?,
                })
            })
            .collect())
    }
}

/// Purchases ⋈ products on `product_id`, then ⋈ users on `user_id`.
///
/// Inner joins: purchases whose product or user is unknown are dropped.
pub fn enrich(purchases: &DataFrame, products: &DataFrame, users: &DataFrame) -> LazyFrame {
    purchases
        .clone()
        .lazy()
        .join(
            products.clone().lazy(),
            [col("product_id")],
            [col("product_id")],
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            users.clone().lazy(),
            [col("user_id")],
            [col("user_id")],
            JoinArgs::new(JoinType::Inner),
        )
}

/// Σ price × quantity per category over the rows inside `cohort` (all rows
/// when `None`). Rounded to two decimals after summation, ordered by category.
pub fn category_totals(enriched: LazyFrame, cohort: Option<&AgeCohort>) -> LazyFrame {
    let rows = match cohort {
        Some(cohort) => enriched.filter(cohort.predicate()),
        None => enriched,
    };

    rows.group_by([col("category")])
        .agg([(col("price") * col("quantity"))
            .sum()
            .round(2)
            .alias("total_sales")])
        .sort(["category"], SortMultipleOptions::default())
}
