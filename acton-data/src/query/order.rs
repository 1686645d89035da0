//! Ordering and slicing types for deferred queries
//!
//! # Example
//!
//! ```rust
//! use acton_data::query::{OrderDirection, SortKey, Window};
//!
//! let newest_first = SortKey::descending("created_at");
//! assert_eq!(newest_first.direction, OrderDirection::Descending);
//!
//! // Skip 40, take 20
//! let window = Window::new(40, 20);
//! assert_eq!(window.offset, 40);
//! ```

use std::fmt;

/// Direction for ordering results
///
/// # Example
///
/// ```rust
/// use acton_data::query::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(format!("{}", OrderDirection::Descending), "desc");
/// assert_eq!(OrderDirection::from_descending(true), OrderDirection::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// Maps an `is_descending` flag to a direction
    #[must_use]
    pub const fn from_descending(is_descending: bool) -> Self {
        if is_descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// SQL `ORDER BY` keyword
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// One `ORDER BY` term: a field and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort on
    pub field: String,
    /// Sort direction
    pub direction: OrderDirection,
}

impl SortKey {
    /// Create a sort key
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending sort on `field`
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Ascending)
    }

    /// Descending sort on `field`
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Descending)
    }
}

/// Offset/limit slice of a result set
///
/// # Example
///
/// ```rust
/// use acton_data::query::Window;
///
/// let page3 = Window::page(2, 20); // zero-based page index
/// assert_eq!(page3.offset, 40);
/// assert_eq!(page3.limit, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Window {
    /// Create a window
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a zero-based page index
    ///
    /// Saturates instead of overflowing for absurdly large pages.
    #[must_use]
    pub const fn page(page_index: u64, page_size: u64) -> Self {
        Self {
            offset: page_index.saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// Applies the window to an already materialized sequence
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).collect()
    }
}
