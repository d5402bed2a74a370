use polars::prelude::*;
use tracing::info;

use crate::ingest::LoadedRelation;
use crate::schema::Relation;

/// A relation after missing-value removal, with row counts on both sides.
#[derive(Debug, Clone)]
pub struct CleanedRelation {
    pub relation: Relation,
    pub rows_before: usize,
    pub frame: DataFrame,
}

impl CleanedRelation {
    pub fn rows_after(&self) -> usize {
        self.frame.height()
    }
}

/// Drop every row that holds a null in any column.
pub fn drop_missing(frame: &DataFrame) -> PolarsResult<DataFrame> {
    frame.drop_nulls::<String>(None)
}

/// Clean a loaded relation. Relations are cleaned independently; a purchase
/// may survive while the user or product it references does not.
pub fn clean(loaded: LoadedRelation) -> PolarsResult<CleanedRelation> {
    let rows_before = loaded.rows();
    let frame = drop_missing(&loaded.frame)?;
    let cleaned = CleanedRelation {
        relation: loaded.relation,
        rows_before,
        frame,
    };

    info!(
        relation = %cleaned.relation,
        before = cleaned.rows_before,
        after = cleaned.rows_after(),
        "cleaned"
    );
    Ok(cleaned)
}
