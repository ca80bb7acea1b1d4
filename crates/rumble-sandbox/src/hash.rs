//! State hashing for determinism verification.
//!
//! Two arenas fed the same spawns and the same inputs must produce identical
//! hashes after every tick. Floats are hashed by bit pattern.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec3;

use crate::arena::Arena;
use crate::body::Body;
use crate::world::SandboxWorld;

/// Hash of every body's kinematic and combat state.
#[must_use]
pub fn hash_world(world: &SandboxWorld) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_bodies(world, &mut hasher);
    hasher.finish()
}

/// Hash of the arena: tick, bodies and every controller's state.
#[must_use]
pub fn hash_arena(arena: &Arena) -> u64 {
    let mut hasher = DefaultHasher::new();
    arena.tick().hash(&mut hasher);
    hash_bodies(arena.world(), &mut hasher);
    for controller in arena.controllers() {
        controller.entity().hash(&mut hasher);
        controller.current_state().hash(&mut hasher);
        let runtime = controller.runtime();
        runtime.have_air_dashed().hash(&mut hasher);
        runtime.dash_timer().to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn hash_bodies<H: Hasher>(world: &SandboxWorld, hasher: &mut H) {
    for (id, body) in world.bodies() {
        id.hash(hasher);
        hash_body(body, hasher);
    }
}

fn hash_body<H: Hasher>(body: &Body, hasher: &mut H) {
    hash_vec3(body.position, hasher);
    hash_vec3(body.velocity, hasher);
    hash_vec3(body.force, hasher);
    body.rage.to_bits().hash(hasher);
    body.mass.to_bits().hash(hasher);
}

fn hash_vec3<H: Hasher>(v: Vec3, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
    v.z.to_bits().hash(hasher);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Collider;
    use crate::world::SandboxConfig;
    use rumble_core::{ForceMode, LayerMask, PhysicsWorld};

    fn populated() -> SandboxWorld {
        let mut world = SandboxWorld::new(SandboxConfig::default()).unwrap();
        world
            .spawn(Body::dynamic(
                Vec3::new(0.0, 2.0, 0.0),
                Collider::Sphere { radius: 0.5 },
                1.0,
                LayerMask::PROP,
            ))
            .unwrap();
        world
    }

    #[test]
    fn identical_worlds_hash_equal() {
        assert_eq!(hash_world(&populated()), hash_world(&populated()));
    }

    #[test]
    fn any_velocity_change_changes_hash() {
        let world = populated();
        let mut nudged = populated();
        let (id, _) = nudged.bodies().next().unwrap();
        nudged.apply_force(id, Vec3::X * 1e-3, ForceMode::VelocityChange);
        assert_ne!(hash_world(&world), hash_world(&nudged));
    }
}
