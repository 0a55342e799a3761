use thiserror::Error;

/// Message used for duplicate time entry ids, both by the storage adapter and
/// by the service-level pre-check.
pub const TIME_ENTRY_ALREADY_EXISTS: &str = "Time entry already exists";

/// Storage-layer fault reported by a port implementation.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DatabaseError {
    pub message: String,
    #[source]
    pub cause: anyhow::Error,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            message: message.into(),
            cause: cause.into(),
        }
    }

    pub fn time_entry_already_exists(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(TIME_ENTRY_ALREADY_EXISTS, cause)
    }

    /// True when the fault is a duplicate time entry id.
    pub fn is_duplicate(&self) -> bool {
        self.message == TIME_ENTRY_ALREADY_EXISTS
    }
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    /// Caller is not authenticated or does not own the resource.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl DomainError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_reads_naturally() {
        let err = DatabaseError::time_entry_already_exists(anyhow::anyhow!("pk violation"));
        assert!(err.is_duplicate());
        let text = err.to_string().to_lowercase();
        assert!(text.contains("time entry already exists"));
    }

    #[test]
    fn database_error_keeps_cause() {
        use std::error::Error as _;

        let err = DatabaseError::new("get_project failed", anyhow::anyhow!("connection reset"));
        assert!(!err.is_duplicate());
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert_eq!(source, "connection reset");
    }

    #[test]
    fn domain_error_wraps_database_error_transparently() {
        let err: DomainError = DatabaseError::new("boom", anyhow::anyhow!("io")).into();
        assert_eq!(err.to_string(), "boom");
        assert!(matches!(err, DomainError::Database(_)));
    }
}
