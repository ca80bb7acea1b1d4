//! Fixed-timestep driver pairing a [`SandboxWorld`] with movement controllers.
//!
//! Each [`Arena::step`]:
//!
//! 1. steps every controller once, in entity id order
//! 2. integrates the world by one fixed step
//!
//! Controllers are stored in a `BTreeMap`, so the stepping order (and with it
//! the order of cross-actor pushes) is identical on every run.
//!
//! # Example
//!
//! ```
//! use rumble_sandbox::{ActorSpawn, Arena, ArenaConfig};
//! use rumble_core::MovementState;
//!
//! let mut arena = Arena::new(ArenaConfig::default()).unwrap();
//! let hero = arena.spawn_actor(ActorSpawn::default()).unwrap();
//!
//! arena.step();
//! assert_eq!(arena.controller(hero).unwrap().current_state(), MovementState::Grounding);
//!
//! arena.controller_mut(hero).unwrap().request_jump();
//! arena.step();
//! assert_eq!(arena.controller(hero).unwrap().current_state(), MovementState::Jumping);
//! ```

use std::collections::BTreeMap;

use glam::Vec3;
use rumble_core::{
    ActorMovementConfig, CapsuleShape, EntityId, LayerMask, MovementController, MovementState,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body::{Body, Collider};
use crate::error::SandboxError;
use crate::world::{SandboxConfig, SandboxWorld};

/// Arena-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Physics settings
    pub world: SandboxConfig,
    /// Fixed steps per second
    pub tick_rate: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            world: SandboxConfig::default(),
            tick_rate: 50,
        }
    }
}

impl ArenaConfig {
    /// Seconds per fixed step.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// Everything needed to put a controlled actor into an arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSpawn {
    /// Body origin; the capsule is centered here
    pub position: Vec3,
    /// Collider, also used for ground and dash probes
    pub capsule: CapsuleShape,
    /// Uniform scale
    pub scale: f32,
    /// Rigid-body mass
    pub mass: f32,
    /// Starting rage
    pub rage: f32,
    /// Movement tunables
    pub movement: ActorMovementConfig,
}

impl Default for ActorSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 0.0),
            capsule: CapsuleShape::default(),
            scale: 1.0,
            mass: 1.0,
            rage: 0.0,
            movement: ActorMovementConfig::default(),
        }
    }
}

impl ActorSpawn {
    /// Default actor standing on a floor at y = 0, at horizontal position `x, z`.
    #[must_use]
    pub fn standing_at(x: f32, z: f32) -> Self {
        let spawn = Self::default();
        Self {
            position: Vec3::new(x, spawn.capsule.height * 0.5, z),
            ..spawn
        }
    }

    /// Returns a copy with the given mass.
    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Returns a copy with the given starting rage.
    #[must_use]
    pub fn with_rage(mut self, rage: f32) -> Self {
        self.rage = rage;
        self
    }

    /// Returns a copy with the given movement tunables.
    #[must_use]
    pub fn with_movement(mut self, movement: ActorMovementConfig) -> Self {
        self.movement = movement;
        self
    }
}

/// Per-actor state in an [`ArenaSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Actor id
    pub id: EntityId,
    /// Locomotion state
    pub state: MovementState,
    /// Body origin
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
    /// Rage percentage
    pub rage: f32,
}

/// Serializable view of all controlled actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// Steps taken so far
    pub tick: u64,
    /// Actors in id order
    pub actors: Vec<ActorSnapshot>,
}

/// A sandbox world plus the controllers driving its actors.
#[derive(Debug)]
pub struct Arena {
    world: SandboxWorld,
    controllers: BTreeMap<EntityId, MovementController>,
    dt: f32,
    tick: u64,
}

impl Arena {
    /// Creates an arena with an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidConfig`] if the tick rate is zero or
    /// the world settings are invalid.
    pub fn new(config: ArenaConfig) -> Result<Self, SandboxError> {
        if config.tick_rate == 0 {
            return Err(SandboxError::InvalidConfig {
                field: "tick_rate",
                reason: "must be at least 1",
            });
        }
        let dt = config.dt();
        Ok(Self {
            world: SandboxWorld::new(config.world)?,
            controllers: BTreeMap::new(),
            dt,
            tick: 0,
        })
    }

    /// Spawns a capsule body on the actor layer and attaches a controller.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidBody`] for an unusable body, or
    /// [`SandboxError::Attach`] if the controller rejects its config. Nothing
    /// is left in the world on failure.
    pub fn spawn_actor(&mut self, spawn: ActorSpawn) -> Result<EntityId, SandboxError> {
        let body = Body::dynamic(
            spawn.position,
            Collider::Capsule(spawn.capsule),
            spawn.mass,
            LayerMask::ACTOR,
        )
        .with_scale(spawn.scale)
        .with_rage(spawn.rage);
        let id = self.world.spawn(body)?;

        match MovementController::attach(id, spawn.movement, spawn.capsule, &self.world) {
            Ok(controller) => {
                debug!(entity = %id, position = ?spawn.position, "actor spawned");
                self.controllers.insert(id, controller);
                Ok(id)
            }
            Err(err) => {
                self.world.despawn(id)?;
                Err(err.into())
            }
        }
    }

    /// Spawns an uncontrolled dynamic sphere on the prop layer.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidBody`] for a non-positive radius or mass.
    pub fn spawn_prop(
        &mut self,
        position: Vec3,
        radius: f32,
        mass: f32,
    ) -> Result<EntityId, SandboxError> {
        self.world.spawn(Body::dynamic(
            position,
            Collider::Sphere { radius },
            mass,
            LayerMask::PROP,
        ))
    }

    /// Removes an actor and its controller.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnknownEntity`] if no such body exists.
    pub fn despawn(&mut self, id: EntityId) -> Result<(), SandboxError> {
        self.world.despawn(id)?;
        self.controllers.remove(&id);
        Ok(())
    }

    /// Advances every controller and then the world by one fixed step.
    pub fn step(&mut self) {
        for controller in self.controllers.values_mut() {
            controller.step(self.dt, &mut self.world);
        }
        self.world.integrate(self.dt);
        self.tick += 1;
    }

    /// Runs `ticks` steps.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Steps taken so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds per step.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// The underlying world.
    #[must_use]
    pub fn world(&self) -> &SandboxWorld {
        &self.world
    }

    /// The underlying world, for direct edits between steps.
    pub fn world_mut(&mut self) -> &mut SandboxWorld {
        &mut self.world
    }

    /// Controller of an actor.
    #[must_use]
    pub fn controller(&self, id: EntityId) -> Option<&MovementController> {
        self.controllers.get(&id)
    }

    /// Controller of an actor, for issuing requests.
    pub fn controller_mut(&mut self, id: EntityId) -> Option<&mut MovementController> {
        self.controllers.get_mut(&id)
    }

    /// Controllers in id order.
    pub fn controllers(&self) -> impl Iterator<Item = &MovementController> {
        self.controllers.values()
    }

    /// Snapshot of every controlled actor.
    #[must_use]
    pub fn snapshot(&self) -> ArenaSnapshot {
        let actors = self
            .controllers
            .iter()
            .filter_map(|(id, controller)| {
                let body = self.world.body(*id)?;
                Some(ActorSnapshot {
                    id: *id,
                    state: controller.current_state(),
                    position: body.position,
                    velocity: body.velocity,
                    rage: body.rage,
                })
            })
            .collect();
        ArenaSnapshot {
            tick: self.tick,
            actors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_arena;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rumble_core::{ConfigError, DashHitPolicy};

    fn arena() -> Arena {
        Arena::new(ArenaConfig::default()).unwrap()
    }

    fn state(arena: &Arena, id: EntityId) -> MovementState {
        arena.controller(id).unwrap().current_state()
    }

    fn body(arena: &Arena, id: EntityId) -> &Body {
        arena.world().body(id).unwrap()
    }

    mod setup_tests {
        use super::*;

        #[test]
        fn zero_tick_rate_is_rejected() {
            let config = ArenaConfig {
                tick_rate: 0,
                ..Default::default()
            };
            assert!(matches!(
                Arena::new(config),
                Err(SandboxError::InvalidConfig {
                    field: "tick_rate",
                    ..
                })
            ));
        }

        #[test]
        fn failed_attach_leaves_no_body() {
            let mut arena = arena();
            let spawn = ActorSpawn::default()
                .with_movement(ActorMovementConfig::default().with_max_speed(f32::NAN));
            let err = arena.spawn_actor(spawn).unwrap_err();
            assert!(matches!(
                err,
                SandboxError::Attach(rumble_core::AttachError::Config(ConfigError::NonFinite { .. }))
            ));
            assert!(arena.world().is_empty());
        }

        #[test]
        fn massless_actor_is_rejected_by_world() {
            let mut arena = arena();
            let err = arena
                .spawn_actor(ActorSpawn::default().with_mass(0.0))
                .unwrap_err();
            assert!(matches!(err, SandboxError::InvalidBody(_)));
        }

        #[test]
        fn despawn_removes_controller() {
            let mut arena = arena();
            let id = arena.spawn_actor(ActorSpawn::default()).unwrap();
            arena.despawn(id).unwrap();
            assert!(arena.controller(id).is_none());
            assert!(arena.world().body(id).is_none());
        }

        #[test]
        fn snapshot_roundtrips_through_json() {
            let mut arena = arena();
            arena.spawn_actor(ActorSpawn::standing_at(-2.0, 0.0)).unwrap();
            arena.spawn_actor(ActorSpawn::standing_at(2.0, 0.0)).unwrap();
            arena.run(3);

            let snapshot = arena.snapshot();
            assert_eq!(snapshot.tick, 3);
            assert_eq!(snapshot.actors.len(), 2);
            let json = serde_json::to_string(&snapshot).unwrap();
            let back: ArenaSnapshot = serde_json::from_str(&json).unwrap();
            assert_eq!(snapshot, back);
        }
    }

    mod locomotion_tests {
        use super::*;

        #[test]
        fn spawned_actor_finds_the_floor() {
            let mut arena = arena();
            let id = arena.spawn_actor(ActorSpawn::default()).unwrap();
            assert_eq!(state(&arena, id), MovementState::Jumping);
            arena.step();
            assert_eq!(state(&arena, id), MovementState::Grounding);
        }

        #[test]
        fn jump_leaves_and_returns_to_the_floor() {
            let mut arena = arena();
            let id = arena.spawn_actor(ActorSpawn::default()).unwrap();
            arena.step();

            arena.controller_mut(id).unwrap().request_jump();
            arena.step();
            assert_eq!(state(&arena, id), MovementState::Jumping);

            let mut peak = 0.0f32;
            for _ in 0..150 {
                arena.step();
                peak = peak.max(body(&arena, id).position.y);
            }
            assert!(peak > 3.0, "peak {peak}");
            assert_eq!(state(&arena, id), MovementState::Grounding);
        }

        #[test]
        fn walking_moves_along_steering() {
            let mut arena = arena();
            let id = arena.spawn_actor(ActorSpawn::default()).unwrap();
            arena.step();

            arena.controller_mut(id).unwrap().request_move_forward(1.0);
            arena.run(50);

            let body = body(&arena, id);
            assert!(body.position.z > 1.0);
            assert!(body.position.x.abs() < 1e-4);
            assert_eq!(state(&arena, id), MovementState::Grounding);
        }
    }

    mod impact_tests {
        use super::*;

        #[test]
        fn dash_into_neighbour_pushes_and_enrages() {
            let mut arena = arena();
            let dasher = arena.spawn_actor(ActorSpawn::standing_at(0.0, 0.0)).unwrap();
            let victim = arena.spawn_actor(ActorSpawn::standing_at(1.0, 0.0)).unwrap();
            arena.step();

            let controller = arena.controller_mut(dasher).unwrap();
            controller.request_move_right(1.0);
            controller.request_dash();
            arena.step();
            assert_eq!(state(&arena, dasher), MovementState::Dashing);

            arena.step();
            let victim_body = body(&arena, victim);
            assert!(victim_body.rage > 0.0);
            assert!(victim_body.velocity.x > 0.0);
            assert_eq!(body(&arena, dasher).rage, 0.0);
        }

        #[test]
        fn once_per_target_dash_hits_once() {
            let mut arena = arena();
            let movement =
                ActorMovementConfig::default().with_dash_hit_policy(DashHitPolicy::OncePerTarget);
            let dasher = arena
                .spawn_actor(ActorSpawn::standing_at(0.0, 0.0).with_movement(movement))
                .unwrap();
            let victim = arena.spawn_actor(ActorSpawn::standing_at(1.0, 0.0)).unwrap();
            arena.step();

            let controller = arena.controller_mut(dasher).unwrap();
            controller.request_move_right(1.0);
            controller.request_dash();
            arena.step();
            arena.step();
            let after_first_hit = body(&arena, victim).rage;
            assert!(after_first_hit > 0.0);

            while state(&arena, dasher) == MovementState::Dashing {
                arena.step();
            }
            assert_eq!(body(&arena, victim).rage, after_first_hit);
        }

        #[test]
        fn slam_landing_pushes_neighbour() {
            let mut arena = arena();
            let slammer = arena.spawn_actor(ActorSpawn::standing_at(0.0, 0.0)).unwrap();
            let victim = arena.spawn_actor(ActorSpawn::standing_at(3.0, 0.0)).unwrap();
            arena.step();

            arena.controller_mut(slammer).unwrap().request_jump();
            arena.step();
            arena.controller_mut(slammer).unwrap().request_slam();
            arena.step();
            assert_eq!(state(&arena, slammer), MovementState::Slamming);

            let mut landed = false;
            for _ in 0..200 {
                arena.step();
                if state(&arena, slammer) != MovementState::Slamming {
                    landed = true;
                    break;
                }
            }
            assert!(landed);

            let victim_body = body(&arena, victim);
            assert!(victim_body.rage > 0.0);
            assert!(victim_body.velocity.x > 0.0);
        }

        #[test]
        fn slam_spares_actors_out_of_radius() {
            let mut arena = arena();
            let movement = ActorMovementConfig::default().with_slam(2.0, 2.0, 100.0);
            let slammer = arena
                .spawn_actor(ActorSpawn::standing_at(0.0, 0.0).with_movement(movement))
                .unwrap();
            let far = arena.spawn_actor(ActorSpawn::standing_at(10.0, 0.0)).unwrap();
            arena.step();

            arena.controller_mut(slammer).unwrap().request_jump();
            arena.step();
            arena.controller_mut(slammer).unwrap().request_slam();
            arena.run(200);

            assert_eq!(body(&arena, far).rage, 0.0);
        }
    }

    mod determinism_tests {
        use super::*;

        fn scripted_run(seed: u64, ticks: usize) -> Vec<u64> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut arena = arena();
            let ids = [
                arena.spawn_actor(ActorSpawn::standing_at(-1.0, 0.0)).unwrap(),
                arena.spawn_actor(ActorSpawn::standing_at(1.0, 0.0)).unwrap(),
                arena.spawn_actor(ActorSpawn::standing_at(0.0, 1.5)).unwrap(),
            ];

            let mut hashes = Vec::with_capacity(ticks);
            for _ in 0..ticks {
                for id in ids {
                    let controller = arena.controller_mut(id).unwrap();
                    controller.request_move_forward(rng.gen_range(-1.0..=1.0));
                    controller.request_move_right(rng.gen_range(-1.0..=1.0));
                    if rng.gen_bool(0.05) {
                        controller.request_jump();
                    }
                    if rng.gen_bool(0.05) {
                        controller.request_dash();
                    }
                    if rng.gen_bool(0.05) {
                        controller.request_slam();
                    }
                }
                arena.step();
                hashes.push(hash_arena(&arena));
            }
            hashes
        }

        #[test]
        fn same_seed_same_hashes() {
            assert_eq!(scripted_run(11, 250), scripted_run(11, 250));
        }

        #[test]
        fn different_seeds_diverge() {
            assert_ne!(scripted_run(11, 250), scripted_run(12, 250));
        }
    }
}
