use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::schema::{Relation, SchemaError};
use crate::session::CsvOptions;

/// A relation read from disk, validated and conformed to its schema.
#[derive(Debug, Clone)]
pub struct LoadedRelation {
    pub relation: Relation,
    pub frame: DataFrame,
}

impl LoadedRelation {
    pub fn rows(&self) -> usize {
        self.frame.height()
    }
}

/// Read a delimited file with a header row and inferred column types, then
/// check and conform it to the relation's declared schema.
pub fn load_relation(
    relation: Relation,
    path: &Path,
    options: &CsvOptions,
) -> Result<LoadedRelation, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            relation,
            path: path.to_path_buf(),
        });
    }

    let read_failed = |e: PolarsError| LoadError::Read {
        relation,
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let raw = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(options.delimiter)
        .with_infer_schema_length(Some(options.infer_schema_rows))
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(read_failed)?;

    let schema = relation.schema();
    schema
        .validate(&raw)
        .map_err(|source| LoadError::Schema { relation, source })?;

    let frame = schema.conform(raw.lazy()).collect().map_err(read_failed)?;

    info!(relation = %relation, rows = frame.height(), path = %path.display(), "loaded");
    Ok(LoadedRelation {
        relation,
        frame,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{relation}: file not found: {}", path.display())]
    NotFound { relation: Relation, path: PathBuf },

    #[error("{relation}: failed to read {}: {reason}", path.display())]
    Read {
        relation: Relation,
        path: PathBuf,
        reason: String,
    },

    #[error("{relation}: schema check failed: {source}")]
    Schema {
        relation: Relation,
        #[source]
        source: SchemaError,
    },
}

impl LoadError {
    pub fn relation(&self) -> Relation {
        match self {
            LoadError::NotFound { relation, .. }
            | LoadError::Read { relation, .. }
            | LoadError::Schema { relation, .. } => *relation,
        }
    }
}
