//! Serializable analysis configuration.
//!
//! Every field has a default, so an empty file (or no file at all) reproduces
//! the fixed behaviour: `data/{users,purchases,products}.csv`, cohort 18-25,
//! top 3.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use saleslab_core::{AgeCohort, CohortError, CsvOptions, DataSources, SessionConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid cohort: {0}")]
    Cohort(#[from] CohortError),

    #[error("report.top_n must be at least 1")]
    ZeroTopN,

    #[error("data.delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(String),

    #[error("data.infer_schema_rows must be at least 1")]
    ZeroInferRows,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub data: DataConfig,
    pub cohort: CohortConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub users: PathBuf,
    pub purchases: PathBuf,
    pub products: PathBuf,
    pub delimiter: String,
    pub infer_schema_rows: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        let sources = DataSources::default();
        let csv = CsvOptions::default();
        Self {
            users: sources.users,
            purchases: sources.purchases,
            products: sources.products,
            delimiter: (csv.delimiter as char).to_string(),
            infer_schema_rows: csv.infer_schema_rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CohortConfig {
    pub min_age: i64,
    pub max_age: i64,
}

impl Default for CohortConfig {
    fn default() -> Self {
        let cohort = AgeCohort::default();
        Self {
            min_age: cohort.min_age,
            max_age: cohort.max_age,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Point all three inputs at their default file names under `dir`.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        let sources = DataSources::in_dir(dir);
        self.data.users = sources.users;
        self.data.purchases = sources.purchases;
        self.data.products = sources.products;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cohort()?;
        self.csv_options()?;
        if self.report.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        Ok(())
    }

    pub fn cohort(&self) -> Result<AgeCohort, ConfigError> {
        Ok(AgeCohort::new(self.cohort.min_age, self.cohort.max_age)?)
    }

    pub fn csv_options(&self) -> Result<CsvOptions, ConfigError> {
        let delimiter = match self.data.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => return Err(ConfigError::Delimiter(self.data.delimiter.clone())),
        };
        if self.data.infer_schema_rows == 0 {
            return Err(ConfigError::ZeroInferRows);
        }
        Ok(CsvOptions {
            delimiter,
            infer_schema_rows: self.data.infer_schema_rows,
        })
    }

    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        Ok(SessionConfig {
            sources: DataSources {
                users: self.data.users.clone(),
                purchases: self.data.purchases.clone(),
                products: self.data.products.clone(),
            },
            csv: self.csv_options()?,
        })
    }
}
