//! Database-specific error types and conversions.

use orgdir_core::error::OrgdirError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed row: {0}")]
    Data(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for OrgdirError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrgdirError::NotFound { entity, id },
            other => OrgdirError::Database(other.to_string()),
        }
    }
}
