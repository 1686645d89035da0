//! One page of results plus the size of the full result set

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::request::{PageRequest, PageRequestValidator};
use crate::entity::Entity;
use crate::error::Result;
use crate::query::{QuerySource, Queryable};

/// A single page of items and the total count across all pages
///
/// Serializes as `{ "items": [..], "pageIndex": .., "pageSize": .., "totalCount": .. }`.
///
/// # Example
///
/// ```rust
/// use acton_data::pagination::PagedList;
///
/// let page = PagedList::create(1..=45, 2, 20)?;
/// assert_eq!(page.items(), &[41, 42, 43, 44, 45]);
/// assert_eq!(page.total_count(), 45);
/// assert_eq!(page.total_pages(), 3);
/// assert!(!page.has_next_page());
/// # Ok::<(), acton_data::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    items: Vec<T>,
    page_index: i64,
    page_size: i64,
    total_count: u64,
}

impl<T> PagedList<T> {
    fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        tracing::debug!(
            page_index = request.page_index,
            page_size = request.page_size,
            total_count,
            items = items.len(),
            "Built page"
        );
        Self {
            items,
            page_index: request.page_index,
            page_size: request.page_size,
            total_count,
        }
    }

    /// Pages an in-memory sequence
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// if `page_index` or `page_size` is negative. The source is not read in
    /// that case.
    pub fn create<I>(source: I, page_index: i64, page_size: i64) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::create_with(&PageRequestValidator::default(), source, page_index, page_size)
    }

    /// Pages an in-memory sequence, checking the request with `validator`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// with every rule `validator` reports.
    pub fn create_with<I>(
        validator: &PageRequestValidator,
        source: I,
        page_index: i64,
        page_size: i64,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let request = PageRequest::new(page_index, page_size);
        let window = validator.window(&request)?;

        let all: Vec<T> = source.into_iter().collect();
        let total_count = all.len() as u64;
        Ok(Self::new(window.apply(all), request, total_count))
    }

    /// Sorts an in-memory sequence by `key`, then pages it
    ///
    /// The sort is stable: items with equal keys keep their source order in
    /// both directions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use acton_data::pagination::PagedList;
    ///
    /// let page = PagedList::create_sorted(vec![1, 2, 3], 0, 3, |n| *n, true)?;
    /// assert_eq!(page.items(), &[3, 2, 1]);
    /// # Ok::<(), acton_data::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// if `page_index` or `page_size` is negative, before anything is sorted.
    pub fn create_sorted<I, K, F>(
        source: I,
        page_index: i64,
        page_size: i64,
        key: F,
        descending: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        K: Ord,
        F: FnMut(&T) -> K,
    {
        Self::create_sorted_with(
            &PageRequestValidator::default(),
            source,
            page_index,
            page_size,
            key,
            descending,
        )
    }

    /// Sorts an in-memory sequence by `key`, then pages it, checking the
    /// request with `validator`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPagination`](crate::Error::InvalidPagination)
    /// with every rule `validator` reports, before anything is sorted.
    pub fn create_sorted_with<I, K, F>(
        validator: &PageRequestValidator,
        source: I,
        page_index: i64,
        page_size: i64,
        mut key: F,
        descending: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let request = PageRequest::new(page_index, page_size);
        let window = validator.window(&request)?;

        let mut all: Vec<T> = source.into_iter().collect();
        all.sort_by(|a, b| {
            let ordering = key(a).cmp(&key(b));
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let total_count = all.len() as u64;
        Ok(Self::new(window.apply(all), request, total_count))
    }

    /// Items on this page
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Requested zero-based page index
    #[must_use]
    pub fn page_index(&self) -> i64 {
        self.page_index
    }

    /// Requested page size
    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of items across all pages
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages, zero when the page size is zero
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        match u64::try_from(self.page_size) {
            Ok(0) | Err(_) => 0,
            Ok(size) => self.total_count.div_ceil(size),
        }
    }

    /// Whether a page follows this one
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::try_from(self.page_index)
            .map(|index| index.saturating_add(1) < self.total_pages())
            .unwrap_or(false)
    }

    /// Whether a page precedes this one
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page_index > 0
    }

    /// Transforms the items, keeping the page metadata
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

impl<T: Entity> PagedList<T> {
    /// Pages a deferred query
    ///
    /// Counting and fetching are two separate round-trips to the source:
    /// the count covers every row the query selects, then only the requested
    /// page of those rows is loaded.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPagination`](crate::Error::InvalidPagination) if the
    ///   index or size is negative; the source is not contacted.
    /// - [`Error::Cancelled`](crate::Error::Cancelled) if `cancel` fires
    ///   before or during either round-trip.
    /// - Any error reported by the source, unchanged.
    pub async fn from_query<S>(
        query: Queryable<'_, S, T>,
        page_index: i64,
        page_size: i64,
        cancel: &CancellationToken,
    ) -> Result<Self>
    where
        S: QuerySource<T>,
    {
        Self::from_query_with(
            &PageRequestValidator::default(),
            query,
            page_index,
            page_size,
            cancel,
        )
        .await
    }

    /// Pages a deferred query, checking the request with `validator`
    ///
    /// ```rust
    /// use acton_data::prelude::*;
    /// # #[derive(Debug, Clone)]
    /// # struct Row(EntityId);
    /// # impl Entity for Row {
    /// #     const ENTITY_TYPE: &'static str = "Row";
    /// #     fn id(&self) -> EntityId { self.0 }
    /// #     fn field(&self, _: &str) -> Option<FieldValue> { None }
    /// # }
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let limits = PaginationConfig { max_page_size: Some(50), ..Default::default() };
    /// let repo = InMemoryRepository::<Row>::new();
    ///
    /// let err = PagedList::from_query_with(
    ///     &limits.validator(),
    ///     repo.list(),
    ///     0,
    ///     500,
    ///     &CancellationToken::new(),
    /// )
    /// .await
    /// .unwrap_err();
    /// assert_eq!(
    ///     err.pagination_errors(),
    ///     Some(&["PageSize must not exceed 50.".to_string()][..])
    /// );
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// As [`from_query`](Self::from_query), with every rule `validator`
    /// reports.
    pub async fn from_query_with<S>(
        validator: &PageRequestValidator,
        query: Queryable<'_, S, T>,
        page_index: i64,
        page_size: i64,
        cancel: &CancellationToken,
    ) -> Result<Self>
    where
        S: QuerySource<T>,
    {
        let request = PageRequest::new(page_index, page_size);
        let window = validator.window(&request)?;

        let total_count = query.count(cancel).await?;
        let items = query.window(window).to_list(cancel).await?;

        Ok(Self::new(items, request, total_count))
    }
}
