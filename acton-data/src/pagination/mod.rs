//! Page slicing with total-count metadata
//!
//! [`PagedList`] is built from a deferred [`Queryable`](crate::query::Queryable)
//! (count and fetch are separate round-trips) or from an in-memory sequence,
//! optionally sorted first. Every variant validates the page request before
//! touching the data and reports all violated rules at once.
//!
//! # Example
//!
//! ```rust
//! use acton_data::pagination::{PagedList, PAGE_INDEX_MUST_BE_NON_NEGATIVE};
//!
//! let page = PagedList::create(vec!["a", "b", "c"], 1, 2)?;
//! assert_eq!(page.items(), &["c"]);
//! assert_eq!(page.total_count(), 3);
//!
//! let err = PagedList::create(vec!["a"], -1, 10).unwrap_err();
//! assert_eq!(err.pagination_errors(), Some(&[PAGE_INDEX_MUST_BE_NON_NEGATIVE.to_string()][..]));
//! # Ok::<(), acton_data::Error>(())
//! ```

mod paged_list;
mod request;

pub use paged_list::PagedList;
pub use request::{
    PageRequest, PageRequestValidation, PageRequestValidator, PaginationError,
    PAGE_INDEX_MUST_BE_NON_NEGATIVE, PAGE_SIZE_MUST_BE_NON_NEGATIVE,
};
