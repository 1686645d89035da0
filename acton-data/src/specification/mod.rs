//! Reusable, composable filtering criteria
//!
//! A [`Specification`] wraps one [`Expr`] predicate for an entity type. The
//! predicate stays an inspectable tree, so the same specification can be
//! evaluated in memory or handed to a [`QuerySource`](crate::query::QuerySource)
//! that translates it into a native filter.
//!
//! Specifications are immutable. Combining them with [`Specification::and`],
//! [`Specification::or`] and [`Specification::negate`] (or `&`, `|`, `!`) always
//! produces a new specification.
//!
//! # Example
//!
//! ```rust
//! use acton_data::prelude::*;
//! use acton_data::specification::field;
//!
//! struct Order {
//!     id: EntityId,
//!     total: i64,
//!     status: &'static str,
//! }
//!
//! impl Entity for Order {
//!     const ENTITY_TYPE: &'static str = "Order";
//!
//!     fn id(&self) -> EntityId {
//!         self.id
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "total" => Some(self.total.into()),
//!             "status" => Some(self.status.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let large = Specification::<Order>::new(field("total").gte(1000_i64));
//! let open = Specification::<Order>::new(field("status").eq("open"));
//! let large_open = &large & &open;
//!
//! let order = Order { id: EntityId::new(), total: 2500, status: "open" };
//! assert!(large_open.is_satisfied_by(&order));
//! assert!(!(!large_open).is_satisfied_by(&order));
//! ```

mod composite;
mod expr;

use std::fmt;
use std::marker::PhantomData;

pub use composite::Junction;
pub use expr::{field, CompareOp, Expr, Field};

use crate::entity::Entity;

/// Filtering criteria for entities of type `T`
pub struct Specification<T> {
    criteria: Expr,
    _entity: PhantomData<fn(&T) -> bool>,
}

impl<T> Specification<T> {
    /// Wraps `criteria` as is
    #[must_use]
    pub fn new(criteria: Expr) -> Self {
        Self {
            criteria,
            _entity: PhantomData,
        }
    }

    /// Satisfied by every entity
    #[must_use]
    pub fn all() -> Self {
        Self::new(Expr::always())
    }

    /// Satisfied by no entity
    #[must_use]
    pub fn none() -> Self {
        Self::new(Expr::never())
    }

    /// The predicate expression
    #[must_use]
    pub fn criteria(&self) -> &Expr {
        &self.criteria
    }

    /// Consumes the specification, returning its predicate expression
    #[must_use]
    pub fn into_criteria(self) -> Expr {
        self.criteria
    }
}

impl<T: Entity> Specification<T> {
    /// Whether `entity` satisfies the criteria
    pub fn is_satisfied_by(&self, entity: &T) -> bool {
        self.criteria.evaluate(entity)
    }

    /// Compiles the criteria into a standalone predicate function
    ///
    /// ```rust
    /// # use acton_data::prelude::*;
    /// # use acton_data::specification::field;
    /// # struct Tag(&'static str);
    /// # impl Entity for Tag {
    /// #     const ENTITY_TYPE: &'static str = "Tag";
    /// #     fn id(&self) -> EntityId { EntityId::empty() }
    /// #     fn field(&self, _: &str) -> Option<FieldValue> { Some(self.0.into()) }
    /// # }
    /// let is_rust = Specification::<Tag>::new(field("name").eq("rust")).compile();
    /// let tags = [Tag("go"), Tag("rust")];
    /// assert_eq!(tags.iter().filter(|t| is_rust(t)).count(), 1);
    /// ```
    #[must_use]
    pub fn compile(&self) -> Box<dyn Fn(&T) -> bool + Send + Sync> {
        let criteria = self.criteria.clone();
        Box::new(move |entity| criteria.evaluate(entity))
    }

    /// Keeps the items that satisfy the criteria, preserving order
    pub fn filter<I>(&self, items: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .filter(|item| self.is_satisfied_by(item))
            .collect()
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self::new(self.criteria.clone())
    }
}

impl<T> PartialEq for Specification<T> {
    fn eq(&self, other: &Self) -> bool {
        self.criteria == other.criteria
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("entity", &std::any::type_name::<T>())
            .field("criteria", &self.criteria)
            .finish()
    }
}

impl<T> From<Expr> for Specification<T> {
    fn from(criteria: Expr) -> Self {
        Self::new(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::query::FieldValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Book {
        title: &'static str,
        pages: i64,
    }

    impl Entity for Book {
        const ENTITY_TYPE: &'static str = "Book";

        fn id(&self) -> EntityId {
            EntityId::empty()
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "title" => Some(self.title.into()),
                "pages" => Some(self.pages.into()),
                _ => None,
            }
        }
    }

    fn books() -> Vec<Book> {
        vec![
            Book { title: "Dune", pages: 412 },
            Book { title: "Emma", pages: 474 },
            Book { title: "Ubik", pages: 202 },
        ]
    }

    #[test]
    fn test_new_keeps_criteria_verbatim() {
        let expr = field("pages").gt(300_i64);
        let spec = Specification::<Book>::new(expr.clone());
        assert_eq!(spec.criteria(), &expr);
        assert_eq!(spec.into_criteria(), expr);
    }

    #[test]
    fn test_all_and_none() {
        let book = Book { title: "Dune", pages: 412 };
        assert!(Specification::<Book>::all().is_satisfied_by(&book));
        assert!(!Specification::<Book>::none().is_satisfied_by(&book));
    }

    #[test]
    fn test_filter_preserves_order() {
        let long = Specification::<Book>::new(field("pages").gt(400_i64));
        let titles: Vec<_> = long.filter(books()).into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Dune", "Emma"]);
    }

    #[test]
    fn test_compile_matches_is_satisfied_by() {
        let spec = Specification::<Book>::new(field("title").like("%u%"));
        let predicate = spec.compile();
        for book in books() {
            assert_eq!(predicate(&book), spec.is_satisfied_by(&book));
        }
    }

    #[test]
    fn test_from_expr() {
        let spec: Specification<Book> = field("pages").lt(250_i64).into();
        assert_eq!(spec.filter(books()).len(), 1);
    }

    #[test]
    fn test_debug_names_entity() {
        let spec = Specification::<Book>::all();
        assert!(format!("{spec:?}").contains("Book"));
    }
}
