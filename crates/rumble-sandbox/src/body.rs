//! Bodies stored in a [`SandboxWorld`](crate::SandboxWorld).

use glam::Vec3;
use rumble_core::{CapsuleShape, LayerMask, Pose};
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, SweptSphere};

/// Collision shape of a body, in local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    /// Sphere centered on the body origin
    Sphere {
        /// Unscaled radius
        radius: f32,
    },
    /// Upright capsule
    Capsule(CapsuleShape),
}

impl Collider {
    /// World-space swept sphere for this collider at `pose`.
    #[must_use]
    pub fn swept(&self, pose: &Pose) -> SweptSphere {
        match self {
            Self::Sphere { radius } => SweptSphere::sphere(pose.position, radius * pose.scale),
            Self::Capsule(shape) => {
                let (bottom, top) = shape.segment(pose);
                SweptSphere::capsule(bottom, top, shape.world_radius(pose, 1.0))
            }
        }
    }

    /// World-space axis-aligned bounds, standing in for render bounds.
    #[must_use]
    pub fn bounds(&self, pose: &Pose) -> Bounds {
        match self {
            Self::Sphere { radius } => {
                Bounds::from_center_extents(pose.position, Vec3::splat(radius * pose.scale))
            }
            Self::Capsule(shape) => {
                let extents = Vec3::new(shape.radius, shape.height * 0.5, shape.radius);
                Bounds::from_center_extents(shape.world_center(pose), extents * pose.scale)
            }
        }
    }
}

/// Motion state of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Integrated every tick and accepts forces
    Dynamic,
    /// Never moves; only answers queries
    Static,
}

/// A collider with optional rigid-body and combat state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Dynamic or static
    pub kind: BodyKind,
    /// World position of the body origin
    pub position: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Linear velocity
    pub velocity: Vec3,
    /// Rigid-body mass
    pub mass: f32,
    /// Rage percentage
    pub rage: f32,
    /// Collision layer
    pub layer: LayerMask,
    /// Local collision shape
    pub collider: Collider,
    /// Continuous force accumulated since the last integration
    pub force: Vec3,
}

impl Body {
    /// A dynamic body at rest.
    #[must_use]
    pub fn dynamic(position: Vec3, collider: Collider, mass: f32, layer: LayerMask) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            scale: 1.0,
            velocity: Vec3::ZERO,
            mass,
            rage: 0.0,
            layer,
            collider,
            force: Vec3::ZERO,
        }
    }

    /// An immovable body.
    #[must_use]
    pub fn fixed(position: Vec3, collider: Collider, layer: LayerMask) -> Self {
        Self {
            kind: BodyKind::Static,
            ..Self::dynamic(position, collider, 0.0, layer)
        }
    }

    /// Returns a copy with the given uniform scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy with the given starting rage.
    #[must_use]
    pub fn with_rage(mut self, rage: f32) -> Self {
        self.rage = rage;
        self
    }

    /// Returns `true` for bodies that accept forces.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::at(self.position).with_scale(self.scale)
    }

    /// World-space collision volume.
    #[must_use]
    pub fn swept(&self) -> SweptSphere {
        self.collider.swept(&self.pose())
    }

    /// World-space render bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.collider.bounds(&self.pose())
    }
}
