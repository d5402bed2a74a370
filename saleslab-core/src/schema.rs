//! Declared schemas for the three input relations.
//!
//! Column types are inferred by the CSV reader, then checked here against a
//! semantic type per declared column and cast to one canonical engine type.
//! Columns that are not declared pass through untouched.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three input relations of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Users,
    Purchases,
    Products,
}

impl Relation {
    /// All relations in report order.
    pub const ALL: [Relation; 3] = [Relation::Users, Relation::Purchases, Relation::Products];

    pub fn name(self) -> &'static str {
        match self {
            Relation::Users => "users",
            Relation::Purchases => "purchases",
            Relation::Products => "products",
        }
    }

    /// Default file name under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Relation::Users => "users.csv",
            Relation::Purchases => "purchases.csv",
            Relation::Products => "products.csv",
        }
    }

    pub fn schema(self) -> &'static RelationSchema {
        match self {
            Relation::Users => &USERS,
            Relation::Purchases => &PURCHASES,
            Relation::Products => &PRODUCTS,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a column means, independent of how the reader typed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticType {
    /// Join key. Integers and strings are both accepted and conformed to strings.
    Identifier,
    Integer,
    Decimal,
    Text,
}

impl SemanticType {
    /// Whether an inferred column type can carry this semantic type.
    pub fn accepts(self, dtype: &DataType) -> bool {
        match self {
            SemanticType::Identifier => dtype.is_integer() || matches!(dtype, DataType::String),
            SemanticType::Integer => dtype.is_integer(),
            SemanticType::Decimal => dtype.is_integer() || dtype.is_float(),
            SemanticType::Text => {
                dtype.is_integer()
                    || dtype.is_float()
                    || matches!(dtype, DataType::String | DataType::Boolean)
            }
        }
    }

    /// Engine type every accepted column is cast to.
    pub fn canonical_dtype(self) -> DataType {
        match self {
            SemanticType::Identifier | SemanticType::Text => DataType::String,
            SemanticType::Integer => DataType::Int64,
            SemanticType::Decimal => DataType::Float64,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Identifier => "identifier",
            SemanticType::Integer => "integer",
            SemanticType::Decimal => "decimal",
            SemanticType::Text => "text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub semantic: SemanticType,
}

const fn column(name: &'static str, semantic: SemanticType) -> ColumnSpec {
    ColumnSpec { name, semantic }
}

/// Required columns of one relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationSchema {
    pub columns: &'static [ColumnSpec],
}

pub static USERS: RelationSchema = RelationSchema {
    columns: &[
        column("user_id", SemanticType::Identifier),
        column("age", SemanticType::Integer),
    ],
};

pub static PRODUCTS: RelationSchema = RelationSchema {
    columns: &[
        column("product_id", SemanticType::Identifier),
        column("category", SemanticType::Text),
    ],
};

pub static PURCHASES: RelationSchema = RelationSchema {
    columns: &[
        column("user_id", SemanticType::Identifier),
        column("product_id", SemanticType::Identifier),
        column("price", SemanticType::Decimal),
        column("quantity", SemanticType::Integer),
    ],
};

impl RelationSchema {
    /// Check that every declared column exists with a compatible type.
    ///
    /// A column without a single value (header-only file, or every cell
    /// blank) is read as text regardless of its meaning, so its type is not
    /// checked. `conform` casts it and cleaning drops its rows.
    pub fn validate(&self, frame: &DataFrame) -> Result<(), SchemaError> {
        let actual = frame.schema();
        for spec in self.columns {
            if !actual.contains(spec.name) {
                return Err(SchemaError::MissingColumn(spec.name.to_string()));
            }
        }

        for spec in self.columns {
            let column = frame.column(spec.name)?;
            if column.null_count() == column.len() {
                continue;
            }
            let dtype = column.dtype();
            if !spec.semantic.accepts(dtype) {
                return Err(SchemaError::TypeMismatch {
                    column: spec.name.to_string(),
                    expected: spec.semantic,
                    actual: dtype.clone(),
                });
            }
        }

        Ok(())
    }

    /// Cast every declared column to its canonical type. Nulls stay null.
    pub fn conform(&self, frame: LazyFrame) -> LazyFrame {
        let casts: Vec<Expr> = self
            .columns
            .iter()
            .map(|spec| col(spec.name).cast(spec.semantic.canonical_dtype()))
            .collect();
        frame.with_columns(casts)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column {column} should hold {expected} values, but was read as {actual:?}")]
    TypeMismatch {
        column: String,
        expected: SemanticType,
        actual: DataType,
    },

    #[error(transparent)]
    Engine(#[from] PolarsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_relation_declares_its_join_key() {
        let names = |r: Relation| -> Vec<&str> { r.schema().columns.iter().map(|c| c.name).collect() };
        assert!(names(Relation::Users).contains(&"user_id"));
        assert!(names(Relation::Products).contains(&"product_id"));
        assert!(names(Relation::Purchases).contains(&"user_id"));
        assert!(names(Relation::Purchases).contains(&"product_id"));
    }

    #[test]
    fn test_validate_accepts_inferred_types() {
        let df = df!(
            "user_id" => &[1i64, 2],
            "product_id" => &["P1", "P2"],
            "price" => &[10i64, 5],
            "quantity" => &[2i64, 1],
        )
        .unwrap();

        assert!(PURCHASES.validate(&df).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_column() {
        let df = df!(
            "user_id" => &[1i64],
            "name" => &["ann"],
        )
        .unwrap();

        let err = USERS.validate(&df).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(ref c) if c == "age"));
    }

    #[test]
    fn test_validate_rejects_text_age() {
        let df = df!(
            "user_id" => &[1i64],
            "age" => &["twenty"],
        )
        .unwrap();

        let err = USERS.validate(&df).unwrap_err();
        match err {
            SchemaError::TypeMismatch { column, expected, .. } => {
                assert_eq!(column, "age");
                assert_eq!(expected, SemanticType::Integer);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conform_casts_declared_columns_only() {
        let df = df!(
            "user_id" => &[7i64],
            "product_id" => &[10i64],
            "price" => &[3i64],
            "quantity" => &[4i64],
            "note" => &[1i64],
        )
        .unwrap();

        let conformed = PURCHASES.conform(df.lazy()).collect().unwrap();
        let schema = conformed.schema();
        assert_eq!(schema.get("user_id"), Some(&DataType::String));
        assert_eq!(schema.get("product_id"), Some(&DataType::String));
        assert_eq!(schema.get("price"), Some(&DataType::Float64));
        assert_eq!(schema.get("quantity"), Some(&DataType::Int64));
        assert_eq!(schema.get("note"), Some(&DataType::Int64));

        let ids = conformed.column("user_id").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("7"));
    }

    #[test]
    fn test_validate_skips_type_check_for_valueless_columns() {
        // Readers type a column with no values as text.
        let df = df!(
            "user_id" => &["1", "2"],
            "age" => &[None::<&str>, None],
        )
        .unwrap();
        assert!(USERS.validate(&df).is_ok());

        let conformed = USERS.conform(df.lazy()).collect().unwrap();
        assert_eq!(conformed.schema().get("age"), Some(&DataType::Int64));
        assert_eq!(conformed.column("age").unwrap().null_count(), 2);
    }

    #[test]
    fn test_validate_accepts_header_only_frame() {
        let df = df!(
            "user_id" => Vec::<&str>::new(),
            "product_id" => Vec::<&str>::new(),
            "price" => Vec::<&str>::new(),
            "quantity" => Vec::<&str>::new(),
        )
        .unwrap();
        assert!(PURCHASES.validate(&df).is_ok());
    }

    #[test]
    fn test_validate_still_checks_partly_filled_columns() {
        let df = df!(
            "user_id" => &["1", "2"],
            "age" => &[Some("old"), None],
        )
        .unwrap();
        assert!(matches!(
            USERS.validate(&df),
            Err(SchemaError::TypeMismatch { .. })
        ));
    }
}
