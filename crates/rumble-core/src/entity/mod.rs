//! Entity identity and per-actor shape components.
//!
//! - [`EntityId`]: Unique identifier for actors, floors and props
//! - [`Pose`]: World position and uniform scale of an entity
//! - [`CapsuleShape`]: Local capsule collider descriptor of an actor
//!
//! Collaborators (physics world, stat store, bounds provider) are all keyed by
//! [`EntityId`]. Two colliders "share a transform" exactly when they report
//! the same `EntityId`.
//!
//! # Example
//!
//! ```
//! use rumble_core::entity::EntityId;
//!
//! let id = EntityId::new(42);
//! assert_eq!(id.as_u64(), 42);
//! assert_eq!(id.to_string(), "42");
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{CapsuleShape, Pose};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64` that provides type safety and
/// a clear semantic meaning. Entity IDs are immutable once assigned and must
/// be unique within a world.
///
/// # Ordering
///
/// Entity IDs are ordered by their numeric value, which world implementations
/// use to return query results in a deterministic order.
///
/// # Example
///
/// ```
/// use rumble_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}
