//! Repository contracts
//!
//! Each capability is its own trait so a read-only store can implement the
//! finders without pretending to support writes. [`Repository`] is
//! implemented automatically for anything that provides all of them.
//!
//! Methods return futures via RPITIT, so implementations can be written with
//! plain `async fn`.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::entity::{Entity, EntityId};
use crate::error::Result;
use crate::query::{QuerySource, Queryable, Tracking};
use crate::specification::Specification;

/// Finds entities matching a [`Specification`]
pub trait FindEntity<T: Entity>: QuerySource<T> + Sized {
    /// Deferred query for entities satisfying `spec`
    ///
    /// Nothing is read until the returned handle is executed, so it can be
    /// refined further or passed to
    /// [`PagedList::from_query`](crate::pagination::PagedList::from_query).
    fn find(&self, spec: &Specification<T>, tracking: Tracking) -> Queryable<'_, Self, T>;

    /// Every entity satisfying `spec`
    fn find_all(
        &self,
        spec: &Specification<T>,
        cancel: &CancellationToken,
        tracking: Tracking,
    ) -> impl Future<Output = Result<Vec<T>>> + Send;
}

/// Looks up one entity by identifier
pub trait GetEntity<T: Entity> {
    /// The entity with `id`, if any
    fn get_by_id(
        &self,
        id: EntityId,
        cancel: &CancellationToken,
        tracking: Tracking,
    ) -> impl Future<Output = Result<Option<T>>> + Send;
}

/// Lists every entity
pub trait ListEntity<T: Entity>: QuerySource<T> + Sized {
    /// Deferred query over all entities
    fn list(&self) -> Queryable<'_, Self, T>;
}

/// Stores a new entity
pub trait AddEntity<T: Entity> {
    /// Adds `entity`
    ///
    /// # Errors
    ///
    /// Stores report a duplicate identifier as
    /// [`RepositoryErrorKind::AlreadyExists`](super::RepositoryErrorKind::AlreadyExists).
    fn add(&self, entity: T, cancel: &CancellationToken)
        -> impl Future<Output = Result<()>> + Send;
}

/// Replaces a stored entity
pub trait UpdateEntity<T: Entity> {
    /// Replaces the entity with the same identifier as `entity`
    ///
    /// # Errors
    ///
    /// Stores report a missing entity as
    /// [`RepositoryErrorKind::NotFound`](super::RepositoryErrorKind::NotFound).
    fn update(
        &self,
        entity: T,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Removes a stored entity
pub trait DeleteEntity<T: Entity> {
    /// Removes the entity with the same identifier as `entity`
    ///
    /// # Errors
    ///
    /// Stores report a missing entity as
    /// [`RepositoryErrorKind::NotFound`](super::RepositoryErrorKind::NotFound).
    fn delete(
        &self,
        entity: &T,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Full read/write repository
pub trait Repository<T: Entity>:
    FindEntity<T> + GetEntity<T> + ListEntity<T> + AddEntity<T> + UpdateEntity<T> + DeleteEntity<T>
{
}

impl<T, R> Repository<T> for R
where
    T: Entity,
    R: FindEntity<T>
        + GetEntity<T>
        + ListEntity<T>
        + AddEntity<T>
        + UpdateEntity<T>
        + DeleteEntity<T>,
{
}
