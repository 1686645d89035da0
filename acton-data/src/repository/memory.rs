//! In-process repository backed by a vector
//!
//! Useful for tests and for services whose data set fits in memory. It
//! evaluates specifications with the same three-valued logic a SQL engine
//! would apply, orders with `NULL`s last (first when descending), and keeps
//! insertion order otherwise.
//!
//! # Example
//!
//! ```rust
//! use acton_data::prelude::*;
//! use acton_data::specification::field;
//!
//! #[derive(Clone)]
//! struct Task {
//!     id: EntityId,
//!     done: bool,
//! }
//!
//! impl Entity for Task {
//!     const ENTITY_TYPE: &'static str = "Task";
//!
//!     fn id(&self) -> EntityId {
//!         self.id
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         (name == "done").then(|| self.done.into())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> acton_data::Result<()> {
//! let repo = InMemoryRepository::new();
//! let cancel = CancellationToken::new();
//! repo.add(Task { id: EntityId::new(), done: false }, &cancel).await?;
//! repo.add(Task { id: EntityId::new(), done: true }, &cancel).await?;
//!
//! let open = Specification::new(field("done").eq(false));
//! let page = PagedList::from_query(repo.find(&open, Tracking::NoTracking), 0, 10, &cancel).await?;
//! assert_eq!(page.total_count(), 1);
//! # Ok(())
//! # }
//! ```

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{AddEntity, DeleteEntity, FindEntity, GetEntity, ListEntity, UpdateEntity};
use crate::cancellation::cancellable;
use crate::entity::{Entity, EntityId};
use crate::error::Result;
use crate::query::{Query, QuerySource, Queryable, Tracking};
use crate::specification::Specification;

/// Repository holding its entities in a `tokio` read/write lock
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity + Clone> InMemoryRepository<T> {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with `entities`, in order
    ///
    /// Seeding does not check for duplicate identifiers.
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> Self {
        Self {
            rows: RwLock::new(entities.into_iter().collect()),
        }
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn position(rows: &[T], id: EntityId) -> Option<usize> {
        rows.iter().position(|row| row.id() == id)
    }
}

impl<T: Entity + Clone> QuerySource<T> for InMemoryRepository<T> {
    async fn count(&self, query: &Query<T>) -> Result<u64> {
        let rows = self.rows.read().await;
        let count = query.select(rows.iter()).len() as u64;
        tracing::trace!(entity = T::ENTITY_TYPE, count, "Counted entities");
        Ok(count)
    }

    async fn load(&self, query: &Query<T>) -> Result<Vec<T>> {
        let selected: Vec<T> = {
            let rows = self.rows.read().await;
            query.select(rows.iter()).into_iter().cloned().collect()
        };

        tracing::debug!(
            entity = T::ENTITY_TYPE,
            rows = selected.len(),
            tracked = query.tracking_mode().is_tracked(),
            "Loaded entities"
        );
        Ok(selected)
    }
}

impl<T: Entity + Clone> FindEntity<T> for InMemoryRepository<T> {
    fn find(&self, spec: &Specification<T>, tracking: Tracking) -> Queryable<'_, Self, T> {
        Queryable::new(self, Query::matching(spec).tracking(tracking))
    }

    async fn find_all(
        &self,
        spec: &Specification<T>,
        cancel: &CancellationToken,
        tracking: Tracking,
    ) -> Result<Vec<T>> {
        self.find(spec, tracking).to_list(cancel).await
    }
}

impl<T: Entity + Clone> GetEntity<T> for InMemoryRepository<T> {
    async fn get_by_id(
        &self,
        id: EntityId,
        cancel: &CancellationToken,
        tracking: Tracking,
    ) -> Result<Option<T>> {
        cancellable(cancel, async {
            let rows = self.rows.read().await;
            let found = Self::position(&rows, id).map(|index| rows[index].clone());
            tracing::debug!(
                entity = T::ENTITY_TYPE,
                id = %id,
                found = found.is_some(),
                tracked = tracking.is_tracked(),
                "Looked up entity"
            );
            Ok(found)
        })
        .await
    }
}

impl<T: Entity + Clone> ListEntity<T> for InMemoryRepository<T> {
    fn list(&self) -> Queryable<'_, Self, T> {
        Queryable::new(self, Query::all())
    }
}

impl<T: Entity + Clone> AddEntity<T> for InMemoryRepository<T> {
    async fn add(&self, entity: T, cancel: &CancellationToken) -> Result<()> {
        cancellable(cancel, async {
            let id = entity.id();
            let mut rows = self.rows.write().await;
            // Unassigned ids never collide
            if !id.is_empty() && Self::position(&rows, id).is_some() {
                return Err(RepositoryError::already_exists(T::ENTITY_TYPE, id.to_string()).into());
            }
            rows.push(entity);
            tracing::debug!(entity = T::ENTITY_TYPE, id = %id, "Added entity");
            Ok(())
        })
        .await
    }
}

impl<T: Entity + Clone> UpdateEntity<T> for InMemoryRepository<T> {
    async fn update(&self, entity: T, cancel: &CancellationToken) -> Result<()> {
        cancellable(cancel, async {
            let id = entity.id();
            let mut rows = self.rows.write().await;
            let index = Self::position(&rows, id).ok_or_else(|| {
                RepositoryError::not_found(
                    RepositoryOperation::Update,
                    T::ENTITY_TYPE,
                    id.to_string(),
                )
            })?;
            rows[index] = entity;
            tracing::debug!(entity = T::ENTITY_TYPE, id = %id, "Updated entity");
            Ok(())
        })
        .await
    }
}

impl<T: Entity + Clone> DeleteEntity<T> for InMemoryRepository<T> {
    async fn delete(&self, entity: &T, cancel: &CancellationToken) -> Result<()> {
        cancellable(cancel, async {
            let id = entity.id();
            let mut rows = self.rows.write().await;
            let index = Self::position(&rows, id).ok_or_else(|| {
                RepositoryError::not_found(
                    RepositoryOperation::Delete,
                    T::ENTITY_TYPE,
                    id.to_string(),
                )
            })?;
            rows.remove(index);
            tracing::debug!(entity = T::ENTITY_TYPE, id = %id, "Deleted entity");
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pagination::PagedList;
    use crate::query::FieldValue;
    use crate::repository::{Repository, RepositoryErrorKind};
    use crate::specification::field;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: EntityId,
        name: String,
        age: i64,
        email: Option<String>,
    }

    impl Person {
        fn new(name: &str, age: i64, email: Option<&str>) -> Self {
            Self {
                id: EntityId::new(),
                name: name.to_string(),
                age,
                email: email.map(str::to_string),
            }
        }
    }

    impl Entity for Person {
        const ENTITY_TYPE: &'static str = "Person";

        fn id(&self) -> EntityId {
            self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(self.name.as_str().into()),
                "age" => Some(self.age.into()),
                "email" => Some(self.email.clone().into()),
                _ => None,
            }
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person::new("Ada", 36, Some("ada@example.com")),
            Person::new("Grace", 45, None),
            Person::new("Alan", 41, Some("alan@example.org")),
            Person::new("Linus", 28, Some("linus@example.com")),
        ]
    }

    fn names(rows: &[Person]) -> Vec<&str> {
        rows.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = InMemoryRepository::new();
        let cancel = CancellationToken::new();
        let ada = Person::new("Ada", 36, None);

        repo.add(ada.clone(), &cancel).await.unwrap();

        let found = repo
            .get_by_id(ada.id, &cancel, Tracking::NoTracking)
            .await
            .unwrap();
        assert_eq!(found, Some(ada));
        assert!(repo
            .get_by_id(EntityId::new(), &cancel, Tracking::Tracked)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_add_duplicate_id_fails() {
        let ada = Person::new("Ada", 36, None);
        let repo = InMemoryRepository::with_entities([ada.clone()]);

        let err = repo.add(ada, &CancellationToken::new()).await.unwrap_err();
        match err {
            Error::Repository(e) => {
                assert_eq!(e.kind, RepositoryErrorKind::AlreadyExists);
                assert_eq!(e.entity_type.as_deref(), Some("Person"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_add_allows_unassigned_ids() {
        let repo = InMemoryRepository::new();
        let cancel = CancellationToken::new();
        for name in ["a", "b"] {
            let mut person = Person::new(name, 1, None);
            person.id = EntityId::empty();
            repo.add(person, &cancel).await.unwrap();
        }
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_replaces_entity() {
        let mut ada = Person::new("Ada", 36, None);
        let repo = InMemoryRepository::with_entities([ada.clone()]);
        let cancel = CancellationToken::new();

        ada.age = 37;
        repo.update(ada.clone(), &cancel).await.unwrap();

        let stored = repo
            .get_by_id(ada.id, &cancel, Tracking::NoTracking)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.age, 37);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_fail() {
        let repo = InMemoryRepository::<Person>::new();
        let cancel = CancellationToken::new();
        let ghost = Person::new("Ghost", 0, None);

        let Error::Repository(update) = repo.update(ghost.clone(), &cancel).await.unwrap_err()
        else {
            panic!("expected repository error");
        };
        assert_eq!(update.kind, RepositoryErrorKind::NotFound);
        assert_eq!(update.operation, RepositoryOperation::Update);

        let Error::Repository(delete) = repo.delete(&ghost, &cancel).await.unwrap_err() else {
            panic!("expected repository error");
        };
        assert_eq!(delete.operation, RepositoryOperation::Delete);
    }

    #[tokio::test]
    async fn test_delete_removes_entity() {
        let rows = people();
        let repo = InMemoryRepository::with_entities(rows.clone());
        repo.delete(&rows[1], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(repo.len().await, 3);
        let all = repo.list().to_list(&CancellationToken::new()).await.unwrap();
        assert_eq!(names(&all), vec!["Ada", "Alan", "Linus"]);
    }

    #[tokio::test]
    async fn test_find_all_with_composed_specification() {
        let repo = InMemoryRepository::with_entities(people());
        let over_thirty = Specification::new(field("age").gt(30_i64));
        let dot_com = Specification::new(field("email").like("%.com"));

        let found = repo
            .find_all(
                &over_thirty.and(&dot_com),
                &CancellationToken::new(),
                Tracking::NoTracking,
            )
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Ada"]);

        let either = repo
            .find_all(
                &(&over_thirty | &dot_com),
                &CancellationToken::new(),
                Tracking::NoTracking,
            )
            .await
            .unwrap();
        assert_eq!(names(&either), vec!["Ada", "Grace", "Alan", "Linus"]);
    }

    #[tokio::test]
    async fn test_null_field_excluded_by_negated_predicate() {
        let repo = InMemoryRepository::with_entities(people());
        let not_dot_com = Specification::new(field("email").like("%.com")).negate();
        let found = repo
            .find_all(&not_dot_com, &CancellationToken::new(), Tracking::NoTracking)
            .await
            .unwrap();
        // Grace has no email: NOT (NULL LIKE ..) is unknown
        assert_eq!(names(&found), vec!["Alan"]);
    }

    #[tokio::test]
    async fn test_ordering_and_nulls() {
        let repo = InMemoryRepository::with_entities(people());
        let cancel = CancellationToken::new();

        let by_age = repo.list().order_by("age").to_list(&cancel).await.unwrap();
        assert_eq!(names(&by_age), vec!["Linus", "Ada", "Alan", "Grace"]);

        let by_email = repo.list().order_by("email").to_list(&cancel).await.unwrap();
        assert_eq!(names(&by_email), vec!["Ada", "Alan", "Linus", "Grace"]);

        let by_email_desc = repo
            .list()
            .order_by_descending("email")
            .to_list(&cancel)
            .await
            .unwrap();
        assert_eq!(names(&by_email_desc), vec!["Grace", "Linus", "Alan", "Ada"]);
    }

    #[tokio::test]
    async fn test_secondary_sort_key() {
        let mut rows = people();
        rows.push(Person::new("Ada", 20, None));
        let repo = InMemoryRepository::with_entities(rows);
        let sorted = repo
            .list()
            .order_by("name")
            .order_by_descending("age")
            .to_list(&CancellationToken::new())
            .await
            .unwrap();
        let pairs: Vec<_> = sorted.iter().map(|p| (p.name.as_str(), p.age)).collect();
        assert_eq!(
            pairs,
            vec![("Ada", 36), ("Ada", 20), ("Alan", 41), ("Grace", 45), ("Linus", 28)]
        );
    }

    #[tokio::test]
    async fn test_skip_take() {
        let repo = InMemoryRepository::with_entities(people());
        let rows = repo
            .list()
            .skip(1)
            .take(2)
            .to_list(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["Grace", "Alan"]);
    }

    #[tokio::test]
    async fn test_paged_find() {
        let repo = InMemoryRepository::with_entities(people());
        let cancel = CancellationToken::new();
        let has_email = Specification::new(field("email").is_not_null());

        let query = repo.find(&has_email, Tracking::NoTracking).order_by("name");
        let page = PagedList::from_query(query, 1, 2, &cancel).await.unwrap();

        assert_eq!(names(page.items()), vec!["Linus"]);
        assert_eq!(page.total_count(), 3);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_operations() {
        let repo = InMemoryRepository::with_entities(people());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = repo
            .add(Person::new("Late", 1, None), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(repo.len().await, 4);

        let err = repo
            .find_all(&Specification::all(), &cancel, Tracking::NoTracking)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        id: EntityId,
        seq: i64,
        value: f64,
    }

    impl Entity for Reading {
        const ENTITY_TYPE: &'static str = "Reading";

        fn id(&self) -> EntityId {
            self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "seq" => Some(self.seq.into()),
                "value" => Some(self.value.into()),
                _ => None,
            }
        }
    }

    fn readings(count: i64) -> InMemoryRepository<Reading> {
        InMemoryRepository::with_entities((1..=count).map(|seq| Reading {
            id: EntityId::new(),
            seq,
            value: if seq % 3 == 0 { f64::NAN } else { (40 - seq) as f64 / 2.0 },
        }))
    }

    fn seqs(rows: &[Reading]) -> Vec<i64> {
        rows.iter().map(|r| r.seq).collect()
    }

    #[tokio::test]
    async fn test_order_by_float_field_with_nan() {
        let repo = readings(40);
        let cancel = CancellationToken::new();

        let ascending = repo.list().order_by("value").to_list(&cancel).await.unwrap();
        assert_eq!(ascending.len(), 40);
        let (numbers, nans) = ascending.split_at(27);
        assert!(numbers.windows(2).all(|w| w[0].value <= w[1].value));
        assert!(nans.iter().all(|r| r.value.is_nan()));
        // Equal keys keep insertion order
        assert_eq!(seqs(nans)[..3], [3, 6, 9]);

        let descending = repo
            .list()
            .order_by_descending("value")
            .to_list(&cancel)
            .await
            .unwrap();
        assert!(descending[..13].iter().all(|r| r.value.is_nan()));
        assert_eq!(descending[13].seq, 1);
    }

    #[tokio::test]
    async fn test_order_by_mixed_integer_and_float() {
        let repo = readings(4);
        let cancel = CancellationToken::new();
        let above = Specification::new(field("value").gt(18_i64));

        let rows = repo
            .find(&above, Tracking::NoTracking)
            .order_by("value")
            .to_list(&cancel)
            .await
            .unwrap();
        // NaN sorts above every number, as in PostgreSQL
        assert_eq!(seqs(&rows), vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_filter_after_take_narrows_taken_rows() {
        let repo = readings(6);
        let cancel = CancellationToken::new();
        let even = Specification::new(field("seq").in_list([2_i64, 4, 6]));

        let rows = repo.list().take(2).filter(&even).to_list(&cancel).await.unwrap();
        assert_eq!(seqs(&rows), vec![2]);
        assert_eq!(repo.list().take(2).filter(&even).count(&cancel).await.unwrap(), 1);

        let rows = repo.list().filter(&even).take(2).to_list(&cancel).await.unwrap();
        assert_eq!(seqs(&rows), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_order_after_take_reorders_taken_rows() {
        let repo = readings(6);
        let cancel = CancellationToken::new();

        let rows = repo
            .list()
            .take(3)
            .order_by_descending("seq")
            .to_list(&cancel)
            .await
            .unwrap();
        assert_eq!(seqs(&rows), vec![3, 2, 1]);

        let rows = repo
            .list()
            .order_by_descending("seq")
            .take(3)
            .to_list(&cancel)
            .await
            .unwrap();
        assert_eq!(seqs(&rows), vec![6, 5, 4]);
    }

    #[tokio::test]
    async fn test_count_respects_window() {
        let repo = readings(6);
        let cancel = CancellationToken::new();

        assert_eq!(repo.list().take(2).count(&cancel).await.unwrap(), 2);
        assert_eq!(repo.list().skip(4).count(&cancel).await.unwrap(), 2);
        assert_eq!(repo.list().skip(10).count(&cancel).await.unwrap(), 0);
        assert_eq!(
            repo.list()
                .order_by_descending("seq")
                .take(100)
                .count(&cancel)
                .await
                .unwrap(),
            6
        );
    }

    #[tokio::test]
    async fn test_page_of_taken_query() {
        let repo = readings(6);
        let cancel = CancellationToken::new();

        let page = PagedList::from_query(repo.list().take(2), 0, 10, &cancel)
            .await
            .unwrap();
        assert_eq!(seqs(page.items()), vec![1, 2]);
        assert_eq!(page.total_count(), 2);
        assert!(!page.has_next_page());

        let page = PagedList::from_query(repo.list().skip(1).take(4), 1, 3, &cancel)
            .await
            .unwrap();
        assert_eq!(seqs(page.items()), vec![5]);
        assert_eq!(page.total_count(), 4);
        assert_eq!(page.total_pages(), 2);
    }

    async fn rename_everyone<R: Repository<Person>>(
        repo: &R,
        cancel: &CancellationToken,
    ) -> Result<usize> {
        let everyone = repo
            .find_all(&Specification::all(), cancel, Tracking::Tracked)
            .await?;
        for mut person in everyone.clone() {
            person.name = person.name.to_uppercase();
            repo.update(person, cancel).await?;
        }
        Ok(everyone.len())
    }

    #[tokio::test]
    async fn test_usable_through_repository_bound() {
        let repo = InMemoryRepository::with_entities(people());
        let cancel = CancellationToken::new();
        assert_eq!(rename_everyone(&repo, &cancel).await.unwrap(), 4);
        let all = repo.list().to_list(&cancel).await.unwrap();
        assert_eq!(names(&all), vec!["ADA", "GRACE", "ALAN", "LINUS"]);
    }
}
