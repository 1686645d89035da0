//! # acton-data
//!
//! Data-access building blocks for acton services: composable filtering
//! specifications, repository contracts, and page slicing with total counts.
//!
//! ## Features
//!
//! - **Specifications**: predicates kept as inspectable expression trees,
//!   combined with `&`, `|` and `!`, evaluated in memory or translated to SQL
//! - **Deferred queries**: filter, order and window a query before a source
//!   executes it
//! - **Pagination**: one page plus the total count, from a query or an
//!   in-memory sequence, with every invalid parameter reported at once
//! - **Repositories**: capability traits and an in-memory implementation
//! - **Outcomes**: success/failure values with user-facing messages
//! - **Cancellation**: every round-trip to a data source takes a
//!   `CancellationToken`
//!
//! ## Example
//!
//! ```rust
//! use acton_data::prelude::*;
//! use acton_data::specification::field;
//!
//! #[derive(Debug, Clone)]
//! struct Product {
//!     id: EntityId,
//!     name: String,
//!     price: i64,
//! }
//!
//! impl Entity for Product {
//!     const ENTITY_TYPE: &'static str = "Product";
//!
//!     fn id(&self) -> EntityId {
//!         self.id
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "name" => Some(self.name.as_str().into()),
//!             "price" => Some(self.price.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let repo = InMemoryRepository::with_entities((1..=30).map(|n| Product {
//!         id: EntityId::new(),
//!         name: format!("item-{n:02}"),
//!         price: n * 100,
//!     }));
//!
//!     let affordable = Specification::new(field("price").lte(2_000_i64));
//!     let named_one = Specification::new(field("name").like("item-1%"));
//!
//!     let query = repo
//!         .find(&(affordable & named_one), Tracking::NoTracking)
//!         .order_by_descending("price");
//!
//!     let page = PagedList::from_query(query, 0, 5, &CancellationToken::new()).await?;
//!     assert_eq!(page.total_count(), 10);
//!     assert_eq!(page.items()[0].name, "item-19");
//!     Ok(())
//! }
//! ```

pub mod cancellation;
pub mod config;
pub mod entity;
pub mod error;
pub mod observability;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod results;
pub mod specification;

pub use error::{Error, Result};

/// Commonly used types and traits
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{Config, LoggingConfig, PaginationConfig};
    pub use crate::entity::{Entity, EntityId};
    pub use crate::error::{Error, Result};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{PageRequest, PagedList, PaginationError};
    pub use crate::query::{FieldValue, Query, QuerySource, Queryable, Tracking};
    pub use crate::repository::{
        AddEntity, DeleteEntity, FindEntity, GetEntity, InMemoryRepository, ListEntity,
        Repository, RepositoryError, UpdateEntity,
    };
    pub use crate::results::{Outcome, OutcomeError};
    pub use crate::specification::Specification;
}
