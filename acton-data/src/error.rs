//! Error types for data access operations
//!
//! Every fallible operation in this crate returns [`Result`]. Pagination
//! validation failures, data source failures and cancellation all surface as
//! variants of [`Error`] rather than panics.

use thiserror::Error;

use crate::pagination::PaginationError;
use crate::repository::RepositoryError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Page index and/or page size were rejected
    #[error("{0}")]
    InvalidPagination(#[from] PaginationError),

    /// Structured error reported by a repository or query source
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// An argument could not be used (e.g. an unsafe field name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted in a state that does not allow it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is the result of cancellation
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Validation messages if this is a pagination error
    #[must_use]
    pub fn pagination_errors(&self) -> Option<&[String]> {
        match self {
            Self::InvalidPagination(err) => Some(err.errors()),
            _ => None,
        }
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;

    #[test]
    fn test_pagination_error_display_lists_every_message() {
        let err: Error =
            PaginationError::new(vec!["first".to_string(), "second".to_string()]).into();
        assert_eq!(
            err.to_string(),
            "Invalid pagination parameters: first, second."
        );
        assert_eq!(err.pagination_errors().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_repository_error_passes_through() {
        let err: Error =
            RepositoryError::timeout(RepositoryOperation::Count, "count timed out").into();
        assert!(err.to_string().contains("timeout"));
        assert!(err.pagination_errors().is_none());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
    }
}
