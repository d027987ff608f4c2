//! Error types shared by every manager in the crate.

use thiserror::Error;

/// Broad classification of a [`CoreError`], used by callers that translate
/// failures into user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Conflict,
    PolicyViolation,
    Internal,
}

/// Core errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Referenced entity does not exist (looked up by a natural key)
    #[error("{entity} not found: {key}")]
    NotFoundByKey { entity: &'static str, key: String },

    /// Malformed or out-of-range input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation clashes with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password rejected by the admin credential policy
    #[error("Password policy violation: {0}")]
    PolicyViolation(String),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        CoreError::NotFound { entity, id }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } | CoreError::NotFoundByKey { .. } => ErrorKind::NotFound,
            CoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::PolicyViolation(_) => ErrorKind::PolicyViolation,
            CoreError::HashingFailed
            | CoreError::Database(_)
            | CoreError::Migration(_)
            | CoreError::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database and migration errors are sanitized to prevent information
    /// disclosure about the internal schema.
    pub fn client_message(&self) -> String {
        match self {
            CoreError::Database(_) | CoreError::Migration(_) | CoreError::Serialization(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// True if the underlying database error is a foreign-key violation
    pub(crate) fn is_foreign_key_violation(&self) -> bool {
        match self {
            CoreError::Database(sqlx::Error::Database(db_err)) => {
                db_err.is_foreign_key_violation()
            }
            _ => false,
        }
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(CoreError::not_found("Team", 3).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::invalid("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(CoreError::conflict("x").kind(), ErrorKind::Conflict);
        assert_eq!(
            CoreError::PolicyViolation("x".to_string()).kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(CoreError::HashingFailed.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_client_message_sanitizes_database_errors() {
        let err = CoreError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = CoreError::not_found("Match", 42);
        assert_eq!(err.client_message(), "Match not found: 42");
    }
}
