//! In-memory rigid-body world implementing the controller collaborators.
//!
//! # Simulation Model
//!
//! - Bodies are stored in a `BTreeMap` keyed by [`EntityId`], so iteration
//!   and query results are ordered by id
//! - An infinite floor plane at `floor_height` is the static entity
//!   [`FLOOR`] on [`LayerMask::GROUND`]
//! - `VelocityChange` forces apply immediately; continuous forces accumulate
//!   until the next [`SandboxWorld::integrate`], which applies `F / m` for
//!   one step
//! - Bodies never collide with each other, only with the floor
//!
//! ```
//! use glam::Vec3;
//! use rumble_core::{LayerMask, PhysicsWorld};
//! use rumble_sandbox::{Body, Collider, SandboxConfig, SandboxWorld, FLOOR};
//!
//! let mut world = SandboxWorld::new(SandboxConfig::default()).unwrap();
//! let ball = world
//!     .spawn(Body::dynamic(
//!         Vec3::new(0.0, 3.0, 0.0),
//!         Collider::Sphere { radius: 0.5 },
//!         1.0,
//!         LayerMask::PROP,
//!     ))
//!     .unwrap();
//!
//! let hit = world.raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 20.0).unwrap();
//! assert_eq!(hit.entity, ball);
//!
//! let hit = world.raycast(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y, 20.0).unwrap();
//! assert_eq!(hit.entity, FLOOR);
//! ```

use std::collections::BTreeMap;

use glam::Vec3;
use rumble_core::{
    BoundsProvider, ColliderHit, EntityId, ForceMode, LayerMask, PhysicsWorld, Pose, RayHit,
    StatStore,
};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::body::{Body, Collider};
use crate::error::SandboxError;
use crate::geometry::SweptSphere;

/// Entity id of the floor plane.
pub const FLOOR: EntityId = EntityId::new(0);

/// Bodies whose bottom is within this distance of the floor count as resting.
const CONTACT_SLOP: f32 = 1e-3;

/// World-wide physics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Gravitational acceleration
    pub gravity: Vec3,
    /// Height of the floor plane
    pub floor_height: f32,
    /// Horizontal velocity damping per second while resting on the floor
    pub ground_friction: f32,
    /// Horizontal velocity damping per second while airborne
    pub air_drag: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            floor_height: 0.0,
            ground_friction: 6.0,
            air_drag: 0.1,
        }
    }
}

impl SandboxConfig {
    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidConfig`] for non-finite values or
    /// negative damping.
    pub fn validate(&self) -> Result<(), SandboxError> {
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", "must be finite"));
        }
        if !self.floor_height.is_finite() {
            return Err(invalid("floor_height", "must be finite"));
        }
        if !(self.ground_friction.is_finite() && self.ground_friction >= 0.0) {
            return Err(invalid("ground_friction", "must be finite and non-negative"));
        }
        if !(self.air_drag.is_finite() && self.air_drag >= 0.0) {
            return Err(invalid("air_drag", "must be finite and non-negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SandboxError {
    SandboxError::InvalidConfig { field, reason }
}

/// A deterministic rigid-body world.
#[derive(Debug, Clone)]
pub struct SandboxWorld {
    config: SandboxConfig,
    bodies: BTreeMap<EntityId, Body>,
    next_id: u64,
}

impl SandboxWorld {
    /// Creates an empty world containing only the floor.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: BTreeMap::new(),
            next_id: FLOOR.as_u64() + 1,
        })
    }

    /// World settings.
    #[must_use]
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Adds a body and returns its id. Ids are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidBody`] for non-finite placement,
    /// non-positive scale, a degenerate collider or, for dynamic bodies, a
    /// non-positive mass.
    pub fn spawn(&mut self, body: Body) -> Result<EntityId, SandboxError> {
        validate_body(&body)?;
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        trace!(entity = %id, kind = ?body.kind, "body spawned");
        self.bodies.insert(id, body);
        Ok(id)
    }

    /// Removes a body.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnknownEntity`] if no such body exists.
    pub fn despawn(&mut self, id: EntityId) -> Result<Body, SandboxError> {
        self.bodies
            .remove(&id)
            .ok_or(SandboxError::UnknownEntity(id))
    }

    /// Returns a body by id.
    #[must_use]
    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Returns a body by id for direct editing.
    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    /// Iterates bodies in id order.
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &Body)> {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    /// Number of bodies, excluding the floor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` if only the floor exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Returns `true` if the body rests on the floor.
    #[must_use]
    pub fn is_resting(&self, id: EntityId) -> bool {
        self.bodies
            .get(&id)
            .is_some_and(|body| body.swept().bottom() <= self.config.floor_height + CONTACT_SLOP)
    }

    /// Advances every dynamic body by `dt` seconds.
    ///
    /// Order per body: gravity and accumulated force, horizontal damping,
    /// position, floor clamp. A body pushed below the floor is lifted onto it
    /// and loses its downward velocity.
    pub fn integrate(&mut self, dt: f32) {
        let config = &self.config;
        let floor = config.floor_height;

        for body in self.bodies.values_mut().filter(|body| body.is_dynamic()) {
            let acceleration = config.gravity + body.force / body.mass;
            body.force = Vec3::ZERO;
            body.velocity += acceleration * dt;

            let resting = body.swept().bottom() <= floor + CONTACT_SLOP;
            let damping = if resting {
                config.ground_friction
            } else {
                config.air_drag
            };
            let keep = (1.0 - damping * dt).max(0.0);
            body.velocity.x *= keep;
            body.velocity.z *= keep;

            body.position += body.velocity * dt;

            let penetration = floor - body.swept().bottom();
            if penetration > 0.0 {
                body.position.y += penetration;
                body.velocity.y = body.velocity.y.max(0.0);
            }
        }
    }

    fn floor_hit(&self, query: &SweptSphere, filter: LayerMask) -> Option<ColliderHit> {
        (filter.intersects(LayerMask::GROUND) && query.bottom() <= self.config.floor_height)
            .then_some(ColliderHit {
                entity: FLOOR,
                layer: LayerMask::GROUND,
            })
    }

    fn overlaps(&self, query: &SweptSphere, filter: LayerMask) -> Vec<ColliderHit> {
        let bodies = self
            .bodies
            .iter()
            .filter(|(_, body)| body.layer.intersects(filter) && body.swept().overlaps(query))
            .map(|(id, body)| ColliderHit {
                entity: *id,
                layer: body.layer,
            });
        self.floor_hit(query, filter).into_iter().chain(bodies).collect()
    }
}

fn validate_body(body: &Body) -> Result<(), SandboxError> {
    if !body.position.is_finite() || !body.velocity.is_finite() {
        return Err(SandboxError::InvalidBody("non-finite placement"));
    }
    if !(body.scale.is_finite() && body.scale > 0.0) {
        return Err(SandboxError::InvalidBody("scale must be positive"));
    }
    if body.is_dynamic() && !(body.mass.is_finite() && body.mass > 0.0) {
        return Err(SandboxError::InvalidBody("dynamic bodies need positive mass"));
    }
    match body.collider {
        Collider::Sphere { radius } if !(radius.is_finite() && radius > 0.0) => {
            Err(SandboxError::InvalidBody("sphere radius must be positive"))
        }
        Collider::Capsule(shape) if shape.validate().is_err() => {
            Err(SandboxError::InvalidBody("degenerate capsule"))
        }
        _ => Ok(()),
    }
}

impl PhysicsWorld for SandboxWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let floor = (direction.y < 0.0 && origin.y >= self.config.floor_height)
            .then(|| (FLOOR, (origin.y - self.config.floor_height) / -direction.y));
        let bodies = self
            .bodies
            .iter()
            .filter_map(|(id, body)| body.swept().ray_hit(origin, direction).map(|t| (*id, t)));

        // Ties go to the lower id: min_by keeps the first of equal elements.
        floor
            .into_iter()
            .chain(bodies)
            .filter(|(_, distance)| *distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, distance)| RayHit {
                entity,
                point: origin + direction * distance,
                distance,
            })
    }

    fn overlap_capsule(
        &self,
        p0: Vec3,
        p1: Vec3,
        radius: f32,
        filter: LayerMask,
    ) -> Vec<ColliderHit> {
        self.overlaps(&SweptSphere::capsule(p0, p1, radius), filter)
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        filter: LayerMask,
        max_results: usize,
    ) -> Vec<ColliderHit> {
        let mut hits = self.overlaps(&SweptSphere::sphere(center, radius), filter);
        hits.truncate(max_results);
        hits
    }

    fn apply_force(&mut self, body: EntityId, force: Vec3, mode: ForceMode) {
        if !force.is_finite() {
            warn!(entity = %body, ?force, "ignoring non-finite force");
            return;
        }
        let Some(target) = self.bodies.get_mut(&body).filter(|b| b.is_dynamic()) else {
            return;
        };
        match mode {
            ForceMode::VelocityChange => target.velocity += force,
            ForceMode::Force => target.force += force,
        }
    }

    fn pose(&self, entity: EntityId) -> Option<Pose> {
        if entity == FLOOR {
            return Some(Pose::at(Vec3::Y * self.config.floor_height));
        }
        self.bodies.get(&entity).map(Body::pose)
    }

    fn velocity(&self, body: EntityId) -> Option<Vec3> {
        self.bodies
            .get(&body)
            .filter(|b| b.is_dynamic())
            .map(|b| b.velocity)
    }

    fn has_rigid_body(&self, entity: EntityId) -> bool {
        self.bodies.get(&entity).is_some_and(Body::is_dynamic)
    }
}

impl StatStore for SandboxWorld {
    fn mass(&self, entity: EntityId) -> Option<f32> {
        self.bodies
            .get(&entity)
            .filter(|b| b.is_dynamic())
            .map(|b| b.mass)
    }

    fn rage(&self, entity: EntityId) -> Option<f32> {
        self.bodies
            .get(&entity)
            .filter(|b| b.is_dynamic())
            .map(|b| b.rage)
    }

    fn add_rage(&mut self, entity: EntityId, amount: f32) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.rage += amount;
        }
    }
}

impl BoundsProvider for SandboxWorld {
    fn bounds_center(&self, entity: EntityId) -> Option<Vec3> {
        self.bodies.get(&entity).map(|b| b.bounds().center())
    }

    fn bounds_extents_magnitude(&self, entity: EntityId) -> Option<f32> {
        self.bodies.get(&entity).map(|b| b.bounds().extents().length())
    }
}
