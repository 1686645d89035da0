//! Structured errors reported by repositories and query sources
//!
//! # Example
//!
//! ```rust
//! use acton_data::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::not_found(RepositoryOperation::Update, "Order", "42");
//! assert_eq!(error.kind, RepositoryErrorKind::NotFound);
//! assert_eq!(error.to_string(), "update Order failed (not_found): entity not found [id=42]");
//! ```

use std::fmt;

/// Repository call that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// `get_by_id`
    GetById,
    /// Building a deferred query with `find`
    Find,
    /// `find_all`
    FindAll,
    /// `list`
    List,
    /// Counting the rows of a deferred query
    Count,
    /// Materializing the rows of a deferred query
    Load,
    /// `add`
    Add,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GetById => "get_by_id",
            Self::Find => "find",
            Self::FindAll => "find_all",
            Self::List => "list",
            Self::Count => "count",
            Self::Load => "load",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// No entity with the requested identifier
    NotFound,
    /// An entity with the same identifier is already stored
    AlreadyExists,
    /// The entity or query was rejected before reaching the store
    ValidationFailed,
    /// The store could not be reached
    ConnectionFailed,
    /// The store did not answer in time
    Timeout,
    /// The store reported a failure
    DataSource,
    /// Rows could not be converted to or from entities
    Serialization,
    /// Anything else
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::ValidationFailed => "validation_failed",
            Self::ConnectionFailed => "connection_failed",
            Self::Timeout => "timeout",
            Self::DataSource => "data_source",
            Self::Serialization => "serialization",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error raised by a repository, carrying the failed operation and the
/// entity involved when one is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// Operation that failed
    pub operation: RepositoryOperation,
    /// Failure category
    pub kind: RepositoryErrorKind,
    /// Human-readable detail
    pub message: String,
    /// Entity type, e.g. `"Order"`
    pub entity_type: Option<String>,
    /// Entity identifier
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Creates an error without entity context
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// No entity with `entity_id` exists
    pub fn not_found(
        operation: RepositoryOperation,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::NotFound, "entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// An entity with `entity_id` is already stored
    pub fn already_exists(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Add,
            RepositoryErrorKind::AlreadyExists,
            "entity already exists",
        )
        .with_entity(entity_type, entity_id)
    }

    /// Input rejected before reaching the store
    pub fn validation_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ValidationFailed, message)
    }

    /// The store could not be reached
    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    /// The store did not answer in time
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// The store reported a failure
    pub fn data_source(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DataSource, message)
    }

    /// Attaches entity context
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Replaces the operation
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether retrying the same call may succeed
    ///
    /// ```rust
    /// use acton_data::repository::{RepositoryError, RepositoryOperation};
    ///
    /// assert!(RepositoryError::timeout(RepositoryOperation::Count, "slow").is_retriable());
    /// assert!(!RepositoryError::already_exists("User", "1").is_retriable());
    /// ```
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity_type {
            Some(entity_type) => write!(f, "{} {} failed", self.operation, entity_type)?,
            None => write!(f, "{} failed", self.operation)?,
        }
        write!(f, " ({}): {}", self.kind, self.message)?;
        if let Some(entity_id) = &self.entity_id {
            write!(f, " [id={entity_id}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
