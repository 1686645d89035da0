//! Deferred queries
//!
//! A [`Query`] describes *what* to read (criteria, ordering, an offset/limit
//! window and a tracking mode) without reading anything. A [`QuerySource`]
//! knows how to count and load the rows a query selects, and a [`Queryable`]
//! pairs the two so callers can keep refining a query before it executes.
//!
//! Nothing touches the data source until [`Queryable::count`] or
//! [`Queryable::to_list`] is awaited.
//!
//! Refinements apply in the order they are made. A query runs as criteria,
//! then ordering, then window; filtering or ordering an already windowed
//! query therefore wraps it as an inner stage, so `take(2)` followed by a
//! filter filters those two rows rather than the whole source.

use std::cmp::Ordering;
use std::future::Future;
use std::marker::PhantomData;

use tokio_util::sync::CancellationToken;

use super::order::{OrderDirection, SortKey, Window};
use super::value::FieldValue;
use crate::cancellation::cancellable;
use crate::entity::{resolve_field, Entity};
use crate::error::Result;
use crate::specification::{Expr, Specification};

/// Whether loaded entities will be modified and written back
///
/// Data sources that distinguish the two (change tracking, row locks) act on
/// it; others may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tracking {
    /// Read-only access
    #[default]
    NoTracking,
    /// Entities are loaded for modification
    Tracked,
}

impl Tracking {
    /// Whether entities are loaded for modification
    #[must_use]
    pub const fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked)
    }
}

/// Description of a read over entities of type `T`
///
/// Each stage reads the rows of its inner stage (or the whole source when
/// there is none), keeps those matching its criteria, orders them and
/// applies its window.
#[derive(Debug)]
pub struct Query<T> {
    inner: Option<Box<Query<T>>>,
    criteria: Option<Expr>,
    sort: Vec<SortKey>,
    window: Option<Window>,
    tracking: Tracking,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            criteria: self.criteria.clone(),
            sort: self.sort.clone(),
            window: self.window,
            tracking: self.tracking,
            _entity: PhantomData,
        }
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> Query<T> {
    /// Every entity, unordered
    #[must_use]
    pub fn all() -> Self {
        Self {
            inner: None,
            criteria: None,
            sort: Vec::new(),
            window: None,
            tracking: Tracking::NoTracking,
            _entity: PhantomData,
        }
    }

    /// Entities satisfying `spec`
    #[must_use]
    pub fn matching(spec: &Specification<T>) -> Self
    where
        T: Entity,
    {
        Self::all().filter(spec.criteria().clone())
    }

    /// Adds criteria, combined with existing criteria by `AND`
    ///
    /// On a windowed query the criteria apply to the rows inside the window.
    #[must_use]
    pub fn filter(self, expr: Expr) -> Self {
        let mut query = self.open_stage();
        query.criteria = Some(match query.criteria.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        query
    }

    /// Appends a sort key; earlier keys take precedence
    ///
    /// On a windowed query only the rows inside the window are reordered.
    #[must_use]
    pub fn order_by(self, key: SortKey) -> Self {
        let mut query = self.open_stage();
        query.sort.push(key);
        query
    }

    /// Restricts the query to a window of its results
    ///
    /// A window applied to an already windowed query selects within the
    /// previous window.
    #[must_use]
    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(match self.window {
            Some(current) => {
                let offset = current.offset.saturating_add(window.offset);
                let remaining = current.limit.saturating_sub(window.offset);
                Window::new(offset, remaining.min(window.limit))
            }
            None => window,
        });
        self
    }

    /// Sets the tracking mode
    #[must_use]
    pub fn tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// Criteria, if any
    #[must_use]
    pub fn criteria(&self) -> Option<&Expr> {
        self.criteria.as_ref()
    }

    /// Sort keys in precedence order
    #[must_use]
    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Offset/limit window, if any
    #[must_use]
    pub fn window_ref(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Tracking mode
    #[must_use]
    pub fn tracking_mode(&self) -> Tracking {
        self.tracking
    }

    /// Stage whose rows this stage reads, if any
    #[must_use]
    pub fn inner(&self) -> Option<&Query<T>> {
        self.inner.as_deref()
    }

    /// The same selection without its outermost ordering, as used for counting
    ///
    /// Windows are kept, and so is the ordering of inner stages because it
    /// decides which rows their windows select.
    #[must_use]
    pub fn unordered(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            criteria: self.criteria.clone(),
            sort: Vec::new(),
            window: self.window,
            tracking: Tracking::NoTracking,
            _entity: PhantomData,
        }
    }

    /// Whether `entity` satisfies the criteria of this stage
    pub fn matches(&self, entity: &T) -> bool
    where
        T: Entity,
    {
        self.criteria
            .as_ref()
            .map_or(true, |criteria| criteria.evaluate(entity))
    }

    /// Runs the query over an in-memory sequence
    ///
    /// Ordering is stable and places `NULL` last (first when descending).
    pub fn select<'a>(&self, rows: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
    where
        T: Entity + 'a,
    {
        let rows: Vec<&'a T> = match &self.inner {
            Some(inner) => inner.select(rows),
            None => rows.into_iter().collect(),
        };

        let mut selected: Vec<&'a T> = rows.into_iter().filter(|row| self.matches(row)).collect();
        if !self.sort.is_empty() {
            selected.sort_by(|a, b| compare_by_keys(*a, *b, &self.sort));
        }

        match self.window {
            Some(window) => window.apply(selected),
            None => selected,
        }
    }

    /// Starts a new stage over `self` if it is windowed
    fn open_stage(self) -> Self {
        if self.window.is_none() {
            return self;
        }
        let tracking = self.tracking;
        Self {
            inner: Some(Box::new(self)),
            criteria: None,
            sort: Vec::new(),
            window: None,
            tracking,
            _entity: PhantomData,
        }
    }
}

fn compare_by_keys<T: Entity>(a: &T, b: &T, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = resolve_field(a, &key.field).unwrap_or(FieldValue::Null);
        let right = resolve_field(b, &key.field).unwrap_or(FieldValue::Null);
        let ordering = match key.direction {
            OrderDirection::Ascending => left.sort_cmp(&right),
            OrderDirection::Descending => left.sort_cmp(&right).reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Executes [`Query`] descriptions against some store
///
/// `load` returns the rows a query selects, in order. `count` returns how
/// many rows `load` would return; [`Queryable::count`] strips the outermost
/// ordering first since it cannot change the count.
///
/// # Example
///
/// ```rust
/// use acton_data::prelude::*;
///
/// struct Empty;
///
/// impl<T: Entity> QuerySource<T> for Empty {
///     async fn count(&self, _query: &Query<T>) -> Result<u64> {
///         Ok(0)
///     }
///
///     async fn load(&self, _query: &Query<T>) -> Result<Vec<T>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait QuerySource<T: Entity>: Send + Sync {
    /// Number of rows the query selects, window included
    fn count(&self, query: &Query<T>) -> impl Future<Output = Result<u64>> + Send;

    /// Rows selected by the query
    fn load(&self, query: &Query<T>) -> impl Future<Output = Result<Vec<T>>> + Send;
}

/// A query bound to the source that will execute it
///
/// Refinements consume and return the handle, so a query can be built up
/// fluently and handed to [`PagedList::from_query`](crate::pagination::PagedList::from_query).
pub struct Queryable<'a, S, T> {
    source: &'a S,
    query: Query<T>,
}

impl<S, T> Clone for Queryable<'_, S, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            query: self.query.clone(),
        }
    }
}

impl<'a, S, T> Queryable<'a, S, T>
where
    S: QuerySource<T>,
    T: Entity,
{
    /// Binds `query` to `source`
    pub fn new(source: &'a S, query: Query<T>) -> Self {
        Self { source, query }
    }

    /// Narrows the query to entities satisfying `spec`
    ///
    /// After [`skip`](Self::skip) or [`take`](Self::take) only the rows
    /// already selected are narrowed.
    #[must_use]
    pub fn filter(self, spec: &Specification<T>) -> Self {
        self.map_query(|query| query.filter(spec.criteria().clone()))
    }

    /// Orders by `field` ascending, after any existing ordering
    #[must_use]
    pub fn order_by(self, field: impl Into<String>) -> Self {
        self.map_query(|query| query.order_by(SortKey::ascending(field)))
    }

    /// Orders by `field` descending, after any existing ordering
    #[must_use]
    pub fn order_by_descending(self, field: impl Into<String>) -> Self {
        self.map_query(|query| query.order_by(SortKey::descending(field)))
    }

    /// Orders by `field` in the given direction
    #[must_use]
    pub fn order_by_direction(self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.map_query(|query| query.order_by(SortKey::new(field, direction)))
    }

    /// Restricts the results to `window`
    #[must_use]
    pub fn window(self, window: Window) -> Self {
        self.map_query(|query| query.window(window))
    }

    /// Skips the first `count` results
    #[must_use]
    pub fn skip(self, count: u64) -> Self {
        self.map_query(|query| query.window(Window::new(count, u64::MAX)))
    }

    /// Keeps at most `count` results
    #[must_use]
    pub fn take(self, count: u64) -> Self {
        self.map_query(|query| query.window(Window::new(0, count)))
    }

    /// The underlying query description
    #[must_use]
    pub fn query(&self) -> &Query<T> {
        &self.query
    }

    /// Unbinds the query from its source
    #[must_use]
    pub fn into_query(self) -> Query<T> {
        self.query
    }

    /// Counts the rows the query selects
    ///
    /// A window applied before counting limits the count the same way it
    /// limits [`to_list`](Self::to_list).
    pub async fn count(&self, cancel: &CancellationToken) -> Result<u64> {
        let query = self.query.unordered();
        cancellable(cancel, self.source.count(&query)).await
    }

    /// Executes the query and collects the selected rows
    pub async fn to_list(&self, cancel: &CancellationToken) -> Result<Vec<T>> {
        cancellable(cancel, self.source.load(&self.query)).await
    }

    fn map_query(self, f: impl FnOnce(Query<T>) -> Query<T>) -> Self {
        Self {
            source: self.source,
            query: f(self.query),
        }
    }
}

impl<S, T> std::fmt::Debug for Queryable<'_, S, T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queryable")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
