//! Entity identity
//!
//! An entity is any record with a stable, globally unique identifier. Rather than
//! inheriting from a base type, records opt in by implementing [`Entity`], which
//! also exposes named fields so that [`Specification`](crate::specification::Specification)
//! criteria can be evaluated against them.
//!
//! # Example
//!
//! ```rust
//! use acton_data::entity::{Entity, EntityId};
//! use acton_data::query::FieldValue;
//!
//! struct User {
//!     id: EntityId,
//!     name: String,
//! }
//!
//! impl Entity for User {
//!     const ENTITY_TYPE: &'static str = "User";
//!
//!     fn id(&self) -> EntityId {
//!         self.id
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "name" => Some(self.name.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let user = User { id: EntityId::new(), name: "Alice".to_string() };
//! assert!(!user.id().is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::FieldValue;

/// Field name under which every entity exposes its identifier
pub const ID_FIELD: &str = "id";

/// Globally unique entity identifier
///
/// New identifiers use UUIDv7 so they sort by creation time. The nil UUID
/// stands for "not assigned yet".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Creates a new time-sortable identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The empty identifier, for entities whose id is assigned later
    #[must_use]
    pub const fn empty() -> Self {
        Self(Uuid::nil())
    }

    /// Wraps an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Whether no identifier has been assigned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// A record with a stable identity whose fields can be inspected by name
///
/// `field` is how predicate expressions read an entity. Returning `None`
/// means the entity has no such field, which evaluates like SQL `NULL`.
/// The identifier is always reachable as [`ID_FIELD`] and need not be
/// repeated in `field`.
pub trait Entity: Send + Sync {
    /// Human-readable entity type, used in error messages (e.g. `"User"`)
    const ENTITY_TYPE: &'static str;

    /// The entity's identifier
    fn id(&self) -> EntityId;

    /// Reads a named field
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Resolves a field on an entity, answering [`ID_FIELD`] from [`Entity::id`]
pub(crate) fn resolve_field<T: Entity + ?Sized>(entity: &T, name: &str) -> Option<FieldValue> {
    if name == ID_FIELD {
        Some(FieldValue::Uuid(*entity.id().as_uuid()))
    } else {
        entity.field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        id: EntityId,
    }

    impl Entity for Widget {
        const ENTITY_TYPE: &'static str = "Widget";

        fn id(&self) -> EntityId {
            self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            (name == "kind").then(|| FieldValue::from("widget"))
        }
    }

    #[test]
    fn test_entity_with_id_keeps_id() {
        let id = EntityId::new();
        let widget = Widget { id };
        assert_eq!(widget.id(), id);
        assert!(!widget.id().is_empty());
    }

    #[test]
    fn test_entity_without_id_is_empty() {
        let widget = Widget {
            id: EntityId::default(),
        };
        assert!(widget.id().is_empty());
        assert_eq!(widget.id(), EntityId::empty());
    }

    #[test]
    fn test_resolve_field_answers_id() {
        let id = EntityId::new();
        let widget = Widget { id };
        assert_eq!(
            resolve_field(&widget, ID_FIELD),
            Some(FieldValue::Uuid(*id.as_uuid()))
        );
        assert_eq!(resolve_field(&widget, "kind"), Some("widget".into()));
        assert_eq!(resolve_field(&widget, "missing"), None);
    }

    #[test]
    fn test_entity_id_round_trips_through_string() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_entity_id_serializes_transparently() {
        let id = EntityId::empty();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
