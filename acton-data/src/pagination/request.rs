//! Page requests and their validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::query::Window;

/// Message reported for a negative page index
pub const PAGE_INDEX_MUST_BE_NON_NEGATIVE: &str = "Page index must be a non-negative value.";

/// Message reported for a negative page size
pub const PAGE_SIZE_MUST_BE_NON_NEGATIVE: &str = "PageSize must be a non-negative value.";

/// Rejected page parameters, listing every rule that was violated
///
/// # Example
///
/// ```rust
/// use acton_data::pagination::PaginationError;
///
/// let err = PaginationError::new(vec!["a".to_string(), "b".to_string()]);
/// assert_eq!(err.to_string(), "Invalid pagination parameters: a, b.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pagination parameters: {}.", joined(.errors))]
pub struct PaginationError {
    errors: Vec<String>,
}

impl PaginationError {
    /// Wraps the collected messages
    #[must_use]
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// Every validation message, in rule order
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

fn joined(errors: &[String]) -> String {
    errors
        .iter()
        .map(|message| message.trim_end_matches('.'))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of validating a [`PageRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRequestValidation {
    /// Whether the request may be served
    pub is_valid: bool,
    /// One message per violated rule
    pub errors: Vec<String>,
}

impl PageRequestValidation {
    /// Builds a validation outcome
    #[must_use]
    pub fn create(is_valid: bool, errors: Vec<String>) -> Self {
        Self { is_valid, errors }
    }

    /// Converts a failed validation into [`PaginationError`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// carrying every message when the request is invalid.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(PaginationError::new(self.errors).into())
        }
    }
}

/// A zero-based page index and a page size
///
/// Serializes as `{ "pageIndex": .., "pageSize": .. }`.
///
/// # Example
///
/// ```rust
/// use acton_data::pagination::PageRequest;
/// use acton_data::query::Window;
///
/// let request = PageRequest::new(2, 25);
/// assert_eq!(request.window()?, Window::new(50, 25));
///
/// let invalid = PageRequest::new(-1, -1).validate();
/// assert!(!invalid.is_valid);
/// assert_eq!(invalid.errors.len(), 2);
/// # Ok::<(), acton_data::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Zero-based page index
    pub page_index: i64,
    /// Items per page
    pub page_size: i64,
}

impl PageRequest {
    /// Create a page request
    #[must_use]
    pub const fn new(page_index: i64, page_size: i64) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Validates against the non-negativity rules
    #[must_use]
    pub fn validate(&self) -> PageRequestValidation {
        PageRequestValidator::default().validate(self)
    }

    /// Offset/limit window for this page
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// if the index or size is negative.
    pub fn window(&self) -> Result<Window> {
        PageRequestValidator::default().window(self)
    }
}

/// Checks page requests, optionally capping the page size
///
/// # Example
///
/// ```rust
/// use acton_data::pagination::{PageRequest, PageRequestValidator};
///
/// let validator = PageRequestValidator::new().with_max_page_size(100);
/// let result = validator.validate(&PageRequest::new(-1, 500));
/// assert_eq!(
///     result.errors,
///     vec![
///         "Page index must be a non-negative value.".to_string(),
///         "PageSize must not exceed 100.".to_string(),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequestValidator {
    max_page_size: Option<i64>,
}

impl PageRequestValidator {
    /// Validator enforcing only non-negativity
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_page_size: None,
        }
    }

    /// Additionally rejects pages larger than `max`
    #[must_use]
    pub const fn with_max_page_size(mut self, max: i64) -> Self {
        self.max_page_size = Some(max);
        self
    }

    /// Configured page size cap
    #[must_use]
    pub const fn max_page_size(&self) -> Option<i64> {
        self.max_page_size
    }

    /// Collects every violated rule
    #[must_use]
    pub fn validate(&self, request: &PageRequest) -> PageRequestValidation {
        let mut errors = Vec::new();

        if request.page_index < 0 {
            errors.push(PAGE_INDEX_MUST_BE_NON_NEGATIVE.to_string());
        }

        if request.page_size < 0 {
            errors.push(PAGE_SIZE_MUST_BE_NON_NEGATIVE.to_string());
        } else if let Some(max) = self.max_page_size {
            if request.page_size > max {
                errors.push(format!("PageSize must not exceed {max}."));
            }
        }

        PageRequestValidation::create(errors.is_empty(), errors)
    }

    /// Validates `request` and returns its window
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// with one message per violated rule.
    pub fn window(&self, request: &PageRequest) -> Result<Window> {
        let validation = self.validate(request);
        if !validation.is_valid {
            tracing::warn!(
                page_index = request.page_index,
                page_size = request.page_size,
                errors = ?validation.errors,
                "Rejected page request"
            );
        }
        validation.into_result()?;

        Ok(Window::page(
            request.page_index.unsigned_abs(),
            request.page_size.unsigned_abs(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_valid_request() {
        let validation = PageRequest::new(0, 10).validate();
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_zero_page_size_is_valid() {
        assert!(PageRequest::new(3, 0).validate().is_valid);
        assert_eq!(PageRequest::new(3, 0).window().unwrap(), Window::new(0, 0));
    }

    #[test]
    fn test_negative_index_only() {
        let validation = PageRequest::new(-1, 5).validate();
        assert!(!validation.is_valid);
        assert_eq!(validation.errors, vec![PAGE_INDEX_MUST_BE_NON_NEGATIVE]);
    }

    #[test]
    fn test_negative_size_only() {
        let validation = PageRequest::new(0, -5).validate();
        assert_eq!(validation.errors, vec![PAGE_SIZE_MUST_BE_NON_NEGATIVE]);
    }

    #[test]
    fn test_both_negative_reports_two_messages() {
        let err = PageRequest::new(-1, -1).window().unwrap_err();
        let messages = err.pagination_errors().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], PAGE_INDEX_MUST_BE_NON_NEGATIVE);
        assert_eq!(messages[1], PAGE_SIZE_MUST_BE_NON_NEGATIVE);
    }

    #[test]
    fn test_max_page_size() {
        let validator = PageRequestValidator::new().with_max_page_size(50);
        assert!(validator.validate(&PageRequest::new(0, 50)).is_valid);

        let err = validator.window(&PageRequest::new(0, 51)).unwrap_err();
        assert!(matches!(err, Error::InvalidPagination(_)));
        assert_eq!(
            err.to_string(),
            "Invalid pagination parameters: PageSize must not exceed 50."
        );
    }

    #[test]
    fn test_error_display_joins_messages() {
        let err = PageRequest::new(-1, -1).window().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pagination parameters: Page index must be a non-negative value, \
             PageSize must be a non-negative value."
        );
    }

    #[test]
    fn test_negative_size_not_also_reported_as_too_large() {
        let validator = PageRequestValidator::new().with_max_page_size(10);
        let validation = validator.validate(&PageRequest::new(0, -1));
        assert_eq!(validation.errors, vec![PAGE_SIZE_MUST_BE_NON_NEGATIVE]);
    }

    #[test]
    fn test_window_offset() {
        assert_eq!(PageRequest::new(4, 1).window().unwrap(), Window::new(4, 1));
        assert_eq!(
            PageRequest::new(2, 20).window().unwrap(),
            Window::new(40, 20)
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(PageRequest::new(1, 10)).unwrap();
        assert_eq!(json, serde_json::json!({ "pageIndex": 1, "pageSize": 10 }));

        let parsed: PageRequest =
            serde_json::from_str(r#"{"pageIndex":2,"pageSize":5}"#).unwrap();
        assert_eq!(parsed, PageRequest::new(2, 5));
    }

    #[test]
    fn test_validation_create() {
        let validation = PageRequestValidation::create(false, vec!["x".to_string()]);
        assert!(validation.into_result().is_err());
        assert!(PageRequestValidation::create(true, Vec::new())
            .into_result()
            .is_ok());
    }
}
