//! Schema build errors.
//!
//! These never abort a registry build: the affected contribution is logged
//! and omitted, and the build continues.

use thiserror::Error;

/// Result type for schema build steps.
pub type SchemaResult<T> = Result<T, SchemaBuildError>;

/// Errors raised while generating the input surface of one relationship.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaBuildError {
    #[error("Missing type: {name}")]
    MissingType { name: String },

    #[error("No unique constraint on {table} covers ({attributes}) for relationship {relationship}")]
    MissingUnique {
        relationship: String,
        table: String,
        attributes: String,
    },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Type {key} depends on itself while being built")]
    Cycle { key: String },

    #[error("Type name {name} is produced by both {existing} and {key}")]
    NameCollision {
        name: String,
        existing: String,
        key: String,
    },

    #[error("Relationship {relationship} generated no connector fields")]
    EmptyConnector { relationship: String },
}

impl SchemaBuildError {
    pub fn missing_type(name: impl Into<String>) -> Self {
        Self::MissingType { name: name.into() }
    }

    pub fn missing_unique(
        relationship: impl Into<String>,
        table: impl Into<String>,
        attributes: &[String],
    ) -> Self {
        Self::MissingUnique {
            relationship: relationship.into(),
            table: table.into(),
            attributes: attributes.join(", "),
        }
    }
}
