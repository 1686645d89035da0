//! Deferred, composable queries over entities
//!
//! - [`Query`]: criteria, ordering, window and tracking mode, not yet executed
//! - [`QuerySource`]: anything that can count and load the rows of a query
//! - [`Queryable`]: a query bound to its source, refined fluently and
//!   executed with `count` / `to_list`
//! - [`sql`]: parameterized SQL generation for relational sources

mod order;
mod source;
pub mod sql;
mod value;

pub use order::{OrderDirection, SortKey, Window};
pub use source::{Query, QuerySource, Queryable, Tracking};
pub use value::FieldValue;
