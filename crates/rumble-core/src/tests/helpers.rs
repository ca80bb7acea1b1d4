//! Scripted collaborator world and controller factories.
//!
//! [`ScriptedWorld`] answers spatial queries from fields the test sets
//! directly instead of doing geometry. Every query and every force is
//! recorded so tests can assert on exactly what a controller asked for.

use std::cell::RefCell;
use std::collections::BTreeMap;

use glam::Vec3;

use crate::config::ActorMovementConfig;
use crate::controller::MovementController;
use crate::entity::{CapsuleShape, EntityId, Pose};
use crate::events::EventLog;
use crate::world::{
    BoundsProvider, ColliderHit, ForceMode, LayerMask, PhysicsWorld, RayHit, StatStore,
};

/// Static floor entity used by [`ScriptedWorld::set_grounded`].
pub const GROUND: EntityId = EntityId::new(1000);

/// Fixed step used throughout the tests (50 Hz).
pub const DT: f32 = 0.02;

// =============================================================================
// Recorded traffic
// =============================================================================

/// A ray cast issued by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

/// A capsule overlap issued by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleQuery {
    pub p0: Vec3,
    pub p1: Vec3,
    pub radius: f32,
    pub filter: LayerMask,
}

/// A sphere overlap issued by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereQuery {
    pub center: Vec3,
    pub radius: f32,
    pub filter: LayerMask,
    pub max_results: usize,
}

/// A force handed to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedForce {
    pub body: EntityId,
    pub force: Vec3,
    pub mode: ForceMode,
}

// =============================================================================
// Scripted world
// =============================================================================

/// One actor's physical and combat state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedActor {
    pub position: Vec3,
    pub scale: f32,
    pub velocity: Vec3,
    pub mass: f32,
    pub rage: f32,
    pub rigid: bool,
    pub bounds_center: Vec3,
    pub extents: f32,
    pub attack_mod: Option<f32>,
}

impl ScriptedActor {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: 1.0,
            velocity: Vec3::ZERO,
            mass: 1.0,
            rage: 0.0,
            rigid: true,
            bounds_center: position,
            extents: 1.0,
            attack_mod: None,
        }
    }
}

/// A world whose query answers are set by hand.
///
/// - `raycast` hits `ray_hit` one unit below the origin, or misses
/// - `overlap_capsule` returns the `contacts` whose layer passes the filter
/// - `overlap_sphere` returns the `sphere_hits` whose layer passes the filter,
///   truncated to `max_results` unless `ignore_cap` is set
/// - velocity changes are added to the body's velocity; forces are only
///   recorded
#[derive(Debug, Default)]
pub struct ScriptedWorld {
    pub ray_hit: Option<EntityId>,
    pub contacts: Vec<ColliderHit>,
    pub sphere_hits: Vec<ColliderHit>,
    pub ignore_cap: bool,
    pub actors: BTreeMap<EntityId, ScriptedActor>,
    pub forces: Vec<AppliedForce>,
    pub ray_queries: RefCell<Vec<RayQuery>>,
    pub capsule_queries: RefCell<Vec<CapsuleQuery>>,
    pub sphere_queries: RefCell<Vec<SphereQuery>>,
    next_id: u64,
}

impl ScriptedWorld {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Adds an actor at `position` with unit mass, no rage and unit scale.
    pub fn spawn_actor(&mut self, position: Vec3) -> EntityId {
        self.spawn_actor_scaled(position, 1.0)
    }

    pub fn spawn_actor_scaled(&mut self, position: Vec3, scale: f32) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        let mut actor = ScriptedActor::at(position);
        actor.scale = scale;
        self.actors.insert(id, actor);
        id
    }

    pub fn actor(&self, id: EntityId) -> &ScriptedActor {
        &self.actors[&id]
    }

    pub fn actor_mut(&mut self, id: EntityId) -> &mut ScriptedActor {
        self.actors.get_mut(&id).expect("unknown actor")
    }

    /// Makes both ground probe phases agree (or both fail).
    pub fn set_grounded(&mut self, grounded: bool) {
        self.contacts.retain(|hit| hit.entity != GROUND);
        if grounded {
            self.ray_hit = Some(GROUND);
            self.contacts.push(ColliderHit {
                entity: GROUND,
                layer: LayerMask::GROUND,
            });
        } else {
            self.ray_hit = None;
        }
    }

    /// Reports `id` as overlapping any capsule query on the actor layer.
    pub fn add_contact(&mut self, id: EntityId) {
        self.contacts.push(ColliderHit {
            entity: id,
            layer: LayerMask::ACTOR,
        });
    }

    /// Reports `id` as inside any sphere query on the actor layer.
    pub fn add_sphere_hit(&mut self, id: EntityId) {
        self.sphere_hits.push(ColliderHit {
            entity: id,
            layer: LayerMask::ACTOR,
        });
    }

    /// Forces applied to `id`, in application order.
    pub fn forces_on(&self, id: EntityId) -> Vec<AppliedForce> {
        self.forces
            .iter()
            .filter(|force| force.body == id)
            .copied()
            .collect()
    }

    /// Clamps every actor's speed, standing in for drag between ticks.
    pub fn limit_speed(&mut self, max_speed: f32) {
        for actor in self.actors.values_mut() {
            actor.velocity = actor.velocity.clamp_length_max(max_speed);
        }
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.ray_queries.borrow_mut().push(RayQuery {
            origin,
            direction,
            max_distance,
        });
        self.ray_hit.map(|entity| RayHit {
            entity,
            point: origin + direction,
            distance: 1.0,
        })
    }

    fn overlap_capsule(
        &self,
        p0: Vec3,
        p1: Vec3,
        radius: f32,
        filter: LayerMask,
    ) -> Vec<ColliderHit> {
        self.capsule_queries.borrow_mut().push(CapsuleQuery {
            p0,
            p1,
            radius,
            filter,
        });
        self.contacts
            .iter()
            .filter(|hit| hit.layer.intersects(filter))
            .copied()
            .collect()
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: LayerMask,
        max_results: usize,
    ) -> Vec<ColliderHit> {
        self.sphere_queries.borrow_mut().push(SphereQuery {
            center,
            radius,
            filter,
            max_results,
        });
        let hits = self
            .sphere_hits
            .iter()
            .filter(|hit| hit.layer.intersects(filter))
            .copied();
        if self.ignore_cap {
            hits.collect()
        } else {
            hits.take(max_results).collect()
        }
    }

    fn apply_force(&mut self, body: EntityId, force: Vec3, mode: ForceMode) {
        self.forces.push(AppliedForce { body, force, mode });
        if let Some(actor) = self.actors.get_mut(&body) {
            if actor.rigid && mode == ForceMode::VelocityChange {
                actor.velocity += force;
            }
        }
    }

    fn pose(&self, entity: EntityId) -> Option<Pose> {
        self.actors
            .get(&entity)
            .map(|actor| Pose::at(actor.position).with_scale(actor.scale))
    }

    fn velocity(&self, body: EntityId) -> Option<Vec3> {
        self.actors
            .get(&body)
            .filter(|actor| actor.rigid)
            .map(|actor| actor.velocity)
    }

    fn has_rigid_body(&self, entity: EntityId) -> bool {
        self.actors.get(&entity).is_some_and(|actor| actor.rigid)
    }
}

impl StatStore for ScriptedWorld {
    fn mass(&self, entity: EntityId) -> Option<f32> {
        self.actors.get(&entity).map(|actor| actor.mass)
    }

    fn rage(&self, entity: EntityId) -> Option<f32> {
        self.actors.get(&entity).map(|actor| actor.rage)
    }

    fn add_rage(&mut self, entity: EntityId, amount: f32) {
        if let Some(actor) = self.actors.get_mut(&entity) {
            actor.rage += amount;
        }
    }

    fn attack_mod(&self, entity: EntityId) -> Option<f32> {
        self.actors.get(&entity).and_then(|actor| actor.attack_mod)
    }
}

impl BoundsProvider for ScriptedWorld {
    fn bounds_center(&self, entity: EntityId) -> Option<Vec3> {
        self.actors.get(&entity).map(|actor| actor.bounds_center)
    }

    fn bounds_extents_magnitude(&self, entity: EntityId) -> Option<f32> {
        self.actors.get(&entity).map(|actor| actor.extents)
    }
}

// =============================================================================
// Controller factories
// =============================================================================

/// Attaches a controller with stock tuning and a 2x0.5 capsule.
pub fn attach(world: &ScriptedWorld, id: EntityId) -> MovementController {
    attach_with(world, id, ActorMovementConfig::default())
}

pub fn attach_with(
    world: &ScriptedWorld,
    id: EntityId,
    config: ActorMovementConfig,
) -> MovementController {
    MovementController::attach(id, config, CapsuleShape::default(), world)
        .expect("scripted actor should attach")
}

/// Attaches a controller with an event log already registered.
pub fn attach_logged(
    world: &ScriptedWorld,
    id: EntityId,
    config: ActorMovementConfig,
) -> (MovementController, EventLog) {
    let mut controller = attach_with(world, id, config);
    let log = EventLog::new();
    controller.add_observer(log.clone());
    (controller, log)
}

/// Steps a freshly attached controller on solid ground until it is `Grounding`.
pub fn land(controller: &mut MovementController, world: &mut ScriptedWorld) {
    world.set_grounded(true);
    controller.step(DT, world);
    world.clear_forces();
}
