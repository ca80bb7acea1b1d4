//! Shape components describing where an actor is and how big it is.
//!
//! The controller never owns an actor's transform; it reads a [`Pose`] from
//! the physics world each tick and combines it with the actor's immutable
//! [`CapsuleShape`] to build ground probes and contact volumes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::AttachError;

/// World-space placement of an entity.
///
/// Rotation is not modelled: actor capsules stay upright.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position of the entity origin
    pub position: Vec3,
    /// Uniform scale applied to local offsets and radii
    pub scale: f32,
}

impl Pose {
    /// Creates a pose at `position` with unit scale.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: 1.0,
        }
    }

    /// Returns a copy of this pose with the given uniform scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Maps a local-space point into world space.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + local * self.scale
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Upright capsule collider in the actor's local space.
///
/// `height` is the full tip-to-tip height; the inner segment runs
/// `height / 2 - radius` above and below `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    /// Local offset of the capsule center from the entity origin
    pub center: Vec3,
    /// Tip-to-tip height
    pub height: f32,
    /// Hemisphere radius
    pub radius: f32,
}

impl CapsuleShape {
    /// Creates a capsule centered on the entity origin.
    #[must_use]
    pub const fn new(height: f32, radius: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            height,
            radius,
        }
    }

    /// Returns a copy of this capsule with a different local center.
    #[must_use]
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Half length of the inner segment, never negative.
    #[must_use]
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// World-space logical center of the capsule.
    #[must_use]
    pub fn world_center(&self, pose: &Pose) -> Vec3 {
        pose.transform_point(self.center)
    }

    /// World-space endpoints of the inner segment, bottom first.
    #[must_use]
    pub fn segment(&self, pose: &Pose) -> (Vec3, Vec3) {
        let half = Vec3::Y * self.half_segment();
        (
            pose.transform_point(self.center - half),
            pose.transform_point(self.center + half),
        )
    }

    /// Radius of the capsule in world space, inflated by `inflate`.
    #[must_use]
    pub fn world_radius(&self, pose: &Pose, inflate: f32) -> f32 {
        self.radius * inflate * pose.scale
    }

    /// Checks that the capsule describes a real volume.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::InvalidCapsule`] if the radius is not positive,
    /// the height is shorter than the diameter, or any value is non-finite.
    pub fn validate(&self) -> Result<(), AttachError> {
        if !self.center.is_finite() || !self.height.is_finite() || !self.radius.is_finite() {
            return Err(AttachError::InvalidCapsule("non-finite dimensions"));
        }
        if self.radius <= 0.0 {
            return Err(AttachError::InvalidCapsule("radius must be positive"));
        }
        if self.height < self.radius * 2.0 {
            return Err(AttachError::InvalidCapsule("height shorter than diameter"));
        }
        Ok(())
    }
}

impl Default for CapsuleShape {
    fn default() -> Self {
        Self::new(2.0, 0.5)
    }
}
