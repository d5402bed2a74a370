//! SalesLab Core: relation schemas, session, loading, cleaning, joins and
//! per-category aggregation.
//!
//! Everything here is a pure function of its input frames except
//! [`Session::load`], which reads from disk:
//! - Declared schemas per input relation, checked and conformed at load
//! - Missing-value removal per relation
//! - Inner joins purchases → products → users
//! - Per-category revenue for the whole population or an age cohort
//! - Category shares of cohort revenue and top-N ranking

pub mod aggregate;
pub mod clean;
pub mod ingest;
pub mod schema;
pub mod session;
pub mod share;

pub use aggregate::{category_totals, enrich, AgeCohort, CategoryTotal, CohortError};
pub use clean::{clean, drop_missing, CleanedRelation};
pub use ingest::{load_relation, LoadError, LoadedRelation};
pub use schema::{ColumnSpec, Relation, RelationSchema, SchemaError, SemanticType};
pub use session::{CsvOptions, DataSources, Session, SessionConfig};
pub use share::{category_shares, top_categories, CategoryShare, ShareError};
