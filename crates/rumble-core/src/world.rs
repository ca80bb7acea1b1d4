//! Collaborator interfaces the controller drives each tick.
//!
//! The controller owns no physics. Everything it reads or mutates outside its
//! own runtime goes through three traits keyed by [`EntityId`]:
//!
//! - [`PhysicsWorld`]: ray casts, shape overlaps, poses, velocities, forces
//! - [`StatStore`]: mass and rage, the stats impact math reads and writes
//! - [`BoundsProvider`]: render-bounds approximation of an actor's extent
//!
//! [`ActorWorld`] bundles all three and is blanket-implemented, so any type
//! implementing the three traits can be passed to
//! [`MovementController::step`](crate::controller::MovementController::step).
//!
//! # Contract
//!
//! - Queries are synchronous and complete within the calling tick.
//! - An empty query result is a normal answer ("no ground", "no targets").
//! - `overlap_sphere` may return at most `max_results` hits; extra overlaps
//!   are dropped by the world, not reported as an error.
//! - Cross-actor force application (one actor pushing another) is the only
//!   path by which a controller mutates state it does not own. Worlds shared
//!   across threads must synchronize it themselves.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Pose};

bitflags! {
    /// Collision layers used to filter spatial queries.
    ///
    /// A collider passes a filter when its layer intersects the filter mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct LayerMask: u32 {
        /// Untagged geometry
        const DEFAULT = 1 << 0;
        /// Floors and platforms actors stand on
        const GROUND = 1 << 1;
        /// Player and bot capsules
        const ACTOR = 1 << 2;
        /// Loose props
        const PROP = 1 << 3;
    }
}

/// How a force vector is applied to a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceMode {
    /// Added directly to velocity, ignoring mass.
    VelocityChange,
    /// Accumulated as a continuous force and integrated with the body's mass.
    Force,
}

/// Result of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Entity owning the collider that was hit
    pub entity: EntityId,
    /// World-space hit point
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

/// A collider reported by an overlap query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderHit {
    /// Entity owning the collider
    pub entity: EntityId,
    /// Layer of the collider
    pub layer: LayerMask,
}

/// Spatial queries and force application.
pub trait PhysicsWorld {
    /// Casts a ray and returns the nearest hit within `max_distance`.
    ///
    /// `direction` is unit length. Colliders that contain `origin` are not
    /// reported.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Returns every collider on `filter` layers overlapping the capsule
    /// swept between `p0` and `p1` with `radius`.
    fn overlap_capsule(&self, p0: Vec3, p1: Vec3, radius: f32, filter: LayerMask)
        -> Vec<ColliderHit>;

    /// Returns up to `max_results` colliders on `filter` layers overlapping
    /// the sphere.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: LayerMask,
        max_results: usize,
    ) -> Vec<ColliderHit>;

    /// Applies `force` to the rigid body of `body`.
    ///
    /// Entities without a rigid body ignore the call.
    fn apply_force(&mut self, body: EntityId, force: Vec3, mode: ForceMode);

    /// Returns the current pose of an entity.
    fn pose(&self, entity: EntityId) -> Option<Pose>;

    /// Returns the current linear velocity of a rigid body.
    fn velocity(&self, body: EntityId) -> Option<Vec3>;

    /// Returns `true` if the entity has a rigid body that accepts forces.
    fn has_rigid_body(&self, entity: EntityId) -> bool;
}

/// Per-actor combat stats.
pub trait StatStore {
    /// Rigid-body mass used to scale incoming pushes.
    fn mass(&self, entity: EntityId) -> Option<f32>;

    /// Rage percentage, `0..` with no upper bound.
    fn rage(&self, entity: EntityId) -> Option<f32>;

    /// Adds `amount` to the entity's rage.
    fn add_rage(&mut self, entity: EntityId, amount: f32);

    /// Damage multiplier override.
    ///
    /// When `None`, the attacker's
    /// [`attack_mod`](crate::config::ActorMovementConfig::attack_mod) tunable
    /// is used.
    fn attack_mod(&self, _entity: EntityId) -> Option<f32> {
        None
    }
}

/// Approximate render bounds of an actor.
pub trait BoundsProvider {
    /// World-space center of the render bounds.
    fn bounds_center(&self, entity: EntityId) -> Option<Vec3>;

    /// Length of the render bounds' half-extents vector.
    fn bounds_extents_magnitude(&self, entity: EntityId) -> Option<f32>;

    /// Lowest point of the bounding sphere around the render bounds.
    fn lowest_point(&self, entity: EntityId) -> Option<Vec3> {
        let center = self.bounds_center(entity)?;
        let reach = self.bounds_extents_magnitude(entity)?;
        Some(center - Vec3::Y * reach)
    }
}

/// Everything a controller needs from the outside world.
pub trait ActorWorld: PhysicsWorld + StatStore + BoundsProvider {}

impl<T: PhysicsWorld + StatStore + BoundsProvider + ?Sized> ActorWorld for T {}
