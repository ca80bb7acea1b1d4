//! Two-phase ground detection.
//!
//! A single downward ray reports false positives on slopes and ledges, and a
//! single overlap reports walls and ceilings. An actor is grounded only when
//! both agree:
//!
//! 1. cast a ray straight down from the capsule's center, at most
//!    `ground_probe_distance` long
//! 2. overlap the actor's own capsule, radius inflated by
//!    `ground_check_percent` and pose scale, against every layer except
//!    `actor_layers`
//! 3. grounded iff some overlapped collider belongs to the entity the ray hit

use glam::Vec3;
use tracing::{trace, warn};

use crate::config::ActorMovementConfig;
use crate::entity::{CapsuleShape, EntityId};
use crate::world::PhysicsWorld;

/// Returns `true` if `entity` is standing on something.
///
/// An entity with no pose is never grounded.
pub fn is_grounded<W: PhysicsWorld + ?Sized>(
    world: &W,
    entity: EntityId,
    capsule: &CapsuleShape,
    config: &ActorMovementConfig,
) -> bool {
    let Some(pose) = world.pose(entity) else {
        warn!(%entity, "no pose for ground probe");
        return false;
    };

    let origin = capsule.world_center(&pose);
    let Some(ray_hit) = world.raycast(origin, Vec3::NEG_Y, config.ground_probe_distance) else {
        trace!(%entity, "ground ray missed");
        return false;
    };

    let (bottom, top) = capsule.segment(&pose);
    let radius = capsule.world_radius(&pose, config.ground_check_percent);
    let grounded = world
        .overlap_capsule(bottom, top, radius, !config.actor_layers)
        .iter()
        .any(|hit| hit.entity == ray_hit.entity);

    trace!(
        %entity,
        support = %ray_hit.entity,
        distance = ray_hit.distance,
        grounded,
        "ground probe"
    );
    grounded
}
