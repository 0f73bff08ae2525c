use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TetherError {
    /// Error reported by the storage engine while executing a statement
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// The entity's migration failed, so its storage cannot be used
    #[error("Schema for `{entity}` is not ready: {source}")]
    SchemaNotReady {
        entity: String,
        #[source]
        source: Arc<TetherError>,
    },

    /// A table, column or type name that cannot be used as an identifier
    #[error("Invalid identifier `{0}`")]
    InvalidIdentifier(String),

    /// Two entities declared under the same name
    #[error("Entity `{0}` is declared more than once")]
    DuplicateEntity(String),

    /// Two fields (declared or reverse) under the same name on one entity
    #[error("Field `{field}` is declared more than once on `{entity}`")]
    DuplicateField { entity: String, field: String },

    /// A relation or lookup names an entity that is not in the registry
    #[error("Unknown entity `{0}`")]
    UnknownEntity(String),

    /// A value or predicate names a field the entity does not have
    #[error("Unknown field `{field}` on `{entity}`")]
    UnknownField { entity: String, field: String },

    /// Attempt to write a query-derived (reverse) field
    #[error("Field `{field}` on `{entity}` is derived and cannot be written")]
    ReadOnlyField { entity: String, field: String },

    /// A reference was given a value that carries no record identity
    #[error("Field `{field}` on `{entity}` expects a record reference, got {found}")]
    MissingIdentity {
        entity: String,
        field: String,
        found: String,
    },

    /// A field was accessed as the wrong kind of relation
    #[error("Field `{field}` on `{entity}` is not a {expected} relation")]
    RelationKind {
        entity: String,
        field: String,
        expected: &'static str,
    },

    /// The schema description is inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A column's text could not be decoded as its declared kind
    #[error("Cannot decode column `{column}` from `{raw}`: {reason}")]
    Decode {
        column: String,
        raw: String,
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// tokio-postgres specific errors
    #[cfg(feature = "tokio-postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl TetherError {
    pub fn decode(column: &str, raw: &str, reason: impl ToString) -> Self {
        Self::Decode {
            column: column.to_string(),
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for tether operations
pub type Result<T> = std::result::Result<T, TetherError>;
