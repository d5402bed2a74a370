//! Execution context for one analysis run.
//!
//! A [`Session`] is opened once, handed by reference to every step, and
//! closed when it goes out of scope, whichever way the run ends.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::ingest::{self, LoadError, LoadedRelation};
use crate::schema::Relation;

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub users: PathBuf,
    pub purchases: PathBuf,
    pub products: PathBuf,
}

impl DataSources {
    /// The default file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            users: dir.join(Relation::Users.file_name()),
            purchases: dir.join(Relation::Purchases.file_name()),
            products: dir.join(Relation::Products.file_name()),
        }
    }

    pub fn path(&self, relation: Relation) -> &Path {
        match relation {
            Relation::Users => &self.users,
            Relation::Purchases => &self.purchases,
            Relation::Products => &self.products,
        }
    }
}

impl Default for DataSources {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

/// Delimited-text reader settings shared by all three loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Rows scanned to infer column types.
    pub infer_schema_rows: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_schema_rows: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub sources: DataSources,
    pub csv: CsvOptions,
}

pub struct Session {
    config: SessionConfig,
    opened_at: Instant,
}

impl Session {
    pub fn open(config: SessionConfig) -> Self {
        debug!(
            users = %config.sources.users.display(),
            purchases = %config.sources.purchases.display(),
            products = %config.sources.products.display(),
            "session opened"
        );
        Self {
            config,
            opened_at: Instant::now(),
        }
    }

    /// Load one relation from its configured file.
    pub fn load(&self, relation: Relation) -> Result<LoadedRelation, LoadError> {
        ingest::load_relation(relation, self.config.sources.path(relation), &self.config.csv)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            elapsed_ms = self.opened_at.elapsed().as_millis() as u64,
            "session closed"
        );
    }
}
