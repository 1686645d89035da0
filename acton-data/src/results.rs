//! Success-or-failure values for reporting expected failures across an API
//! boundary without an error channel
//!
//! [`Outcome`] carries either a value or an [`OutcomeError`] with a message
//! and a title that can be shown to users as is. Crate operations themselves
//! return [`Result`](crate::Result); [`Outcome::from_result`] bridges the two.
//!
//! # Example
//!
//! ```rust
//! use acton_data::results::{Outcome, OutcomeError};
//!
//! let found: Outcome<u32> = Outcome::create(Some(7));
//! assert!(found.is_success());
//! assert_eq!(*found.value(), 7);
//!
//! let missing: Outcome<u32> = Outcome::create(None);
//! assert!(missing.is_failure());
//! assert_eq!(missing.error(), &OutcomeError::NULL_VALUE);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};

const DEFAULT_FAILURE_MESSAGE: &str = "An error occurred.";
const DEFAULT_FAILURE_TITLE: &str = "Error";
const FAILED_VALUE_ACCESS: &str = "The value of a failure result cannot be accessed.";

/// A user-facing error: what went wrong and a short title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("{title}: {message}")]
pub struct OutcomeError {
    /// Description of the failure
    pub message: Cow<'static, str>,
    /// Short heading
    pub title: Cow<'static, str>,
}

impl OutcomeError {
    /// The absence of an error, carried by successful outcomes
    pub const NONE: Self = Self {
        message: Cow::Borrowed(""),
        title: Cow::Borrowed(""),
    };

    /// A required value was missing
    pub const NULL_VALUE: Self = Self {
        message: Cow::Borrowed("Null value was provided."),
        title: Cow::Borrowed("Null value."),
    };

    /// Create an error
    pub fn new(message: impl Into<Cow<'static, str>>, title: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            title: title.into(),
        }
    }
}

impl Default for OutcomeError {
    fn default() -> Self {
        Self::NONE
    }
}

/// Either a value of type `T` or an [`OutcomeError`]
///
/// Use `Outcome` (that is, `Outcome<()>`) when there is no value to return.
#[derive(Clone, PartialEq, Eq)]
pub struct Outcome<T = ()> {
    value: Option<T>,
    error: OutcomeError,
}

impl Outcome<()> {
    /// Successful outcome without a value
    #[must_use]
    pub fn success() -> Self {
        Self::success_with(())
    }
}

impl<T> Outcome<T> {
    /// Successful outcome holding `value`
    #[must_use]
    pub fn success_with(value: T) -> Self {
        Self {
            value: Some(value),
            error: OutcomeError::NONE,
        }
    }

    /// Failed outcome with the generic message and title
    #[must_use]
    pub fn failure() -> Self {
        Self::failure_with(DEFAULT_FAILURE_MESSAGE, DEFAULT_FAILURE_TITLE)
    }

    /// Failed outcome with a specific message and title
    #[must_use]
    pub fn failure_with(
        message: impl Into<Cow<'static, str>>,
        title: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::failure_from(OutcomeError::new(message, title))
    }

    /// Failed outcome carrying `error`
    #[must_use]
    pub fn failure_from(error: OutcomeError) -> Self {
        Self { value: None, error }
    }

    /// Success for `Some`, a [`OutcomeError::NULL_VALUE`] failure for `None`
    #[must_use]
    pub fn create(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::success_with(value),
            None => Self::failure_from(OutcomeError::NULL_VALUE),
        }
    }

    /// Converts a `Result`, using the error's `Display` text as the message
    ///
    /// ```rust
    /// use acton_data::pagination::PagedList;
    /// use acton_data::results::Outcome;
    ///
    /// let outcome = Outcome::from_result(PagedList::create(vec![1], -1, 1), "Invalid page");
    /// assert!(outcome.is_failure());
    /// assert_eq!(outcome.error().title, "Invalid page");
    /// ```
    pub fn from_result<E: fmt::Display>(
        result: std::result::Result<T, E>,
        title: impl Into<Cow<'static, str>>,
    ) -> Self {
        match result {
            Ok(value) => Self::success_with(value),
            Err(err) => Self::failure_with(err.to_string(), title),
        }
    }

    /// Whether the operation succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the operation failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.value.is_none()
    }

    /// The error; [`OutcomeError::NONE`] for a success
    #[must_use]
    pub fn error(&self) -> &OutcomeError {
        &self.error
    }

    /// The value of a successful outcome
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a failure. Reading the value of a failure is
    /// a programming error; use [`Outcome::try_value`] when failure is
    /// expected.
    #[must_use]
    pub fn value(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => panic!("{FAILED_VALUE_ACCESS}"),
        }
    }

    /// The value, or [`Error::InvalidState`] for a failure
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the outcome is a failure.
    pub fn try_value(&self) -> Result<&T> {
        self.value
            .as_ref()
            .ok_or_else(|| Error::InvalidState(FAILED_VALUE_ACCESS.to_string()))
    }

    /// Consumes the outcome, returning the value
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the outcome is a failure.
    pub fn into_value(self) -> Result<T> {
        self.value
            .ok_or_else(|| Error::InvalidState(FAILED_VALUE_ACCESS.to_string()))
    }

    /// Transforms the value of a success; failures pass through
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: self.value.map(f),
            error: self.error,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        Self::create(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("Success").field(value).finish(),
            None => f.debug_tuple("Failure").field(&self.error).finish(),
        }
    }
}
