//! Repository contracts and an in-memory implementation
//!
//! # Features
//!
//! - **Split contracts**: [`FindEntity`], [`GetEntity`], [`ListEntity`],
//!   [`AddEntity`], [`UpdateEntity`], [`DeleteEntity`], with [`Repository`]
//!   implemented for anything providing all six
//! - **Deferred finds**: `find` and `list` return a
//!   [`Queryable`](crate::query::Queryable) that can be refined and paged
//! - **Structured errors**: [`RepositoryError`] records the operation, the
//!   failure kind and the entity involved
//! - **Reference store**: [`InMemoryRepository`]
//!
//! # Example
//!
//! ```rust
//! use acton_data::prelude::*;
//!
//! #[derive(Clone)]
//! struct Note {
//!     id: EntityId,
//! }
//!
//! impl Entity for Note {
//!     const ENTITY_TYPE: &'static str = "Note";
//!
//!     fn id(&self) -> EntityId {
//!         self.id
//!     }
//!
//!     fn field(&self, _name: &str) -> Option<FieldValue> {
//!         None
//!     }
//! }
//!
//! async fn purge<R: Repository<Note>>(repo: &R, cancel: &CancellationToken) -> Result<usize> {
//!     let notes = repo.list().to_list(cancel).await?;
//!     for note in &notes {
//!         repo.delete(note, cancel).await?;
//!     }
//!     Ok(notes.len())
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let repo = InMemoryRepository::with_entities([Note { id: EntityId::new() }]);
//! assert_eq!(purge(&repo, &CancellationToken::new()).await?, 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryRepository;
pub use traits::{
    AddEntity, DeleteEntity, FindEntity, GetEntity, ListEntity, Repository, UpdateEntity,
};

pub use crate::query::Tracking;
