//! Geometry primitives for the sandbox's collision queries.
//!
//! Every collider in the sandbox is a swept sphere: an upright capsule is a
//! segment with a radius, a sphere is a degenerate segment. That keeps ray
//! casts and overlaps down to a handful of closest-point routines.

use glam::Vec3;
use serde::{Deserialize, Serialize};

const EPSILON: f32 = 1e-6;

// =============================================================================
// Bounds
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from a center and half-extents.
    #[must_use]
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the bounds.
    #[must_use]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if this bounds intersects a sphere.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        center.distance_squared(closest) <= radius * radius
    }
}

// =============================================================================
// Swept spheres
// =============================================================================

/// A segment inflated by a radius: capsule, or sphere when `a == b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptSphere {
    /// First segment endpoint
    pub a: Vec3,
    /// Second segment endpoint
    pub b: Vec3,
    /// Inflation radius
    pub radius: f32,
}

impl SweptSphere {
    /// A capsule between `a` and `b`.
    #[must_use]
    pub const fn capsule(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self { a, b, radius }
    }

    /// A sphere at `center`.
    #[must_use]
    pub const fn sphere(center: Vec3, radius: f32) -> Self {
        Self {
            a: center,
            b: center,
            radius,
        }
    }

    /// Lowest y reached by the volume.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.a.y.min(self.b.y) - self.radius
    }

    /// Returns `true` if `point` lies inside or on the volume.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance_squared(closest_point_on_segment(point, self.a, self.b))
            <= self.radius * self.radius
    }

    /// Returns `true` if the two volumes touch.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        segment_segment_distance_squared(self.a, self.b, other.a, other.b) <= reach * reach
    }

    /// Distance along a unit ray to the first surface hit, if any.
    ///
    /// Rays starting inside the volume report no hit.
    #[must_use]
    pub fn ray_hit(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        if self.contains(origin) {
            return None;
        }
        let caps = [self.a, self.b]
            .into_iter()
            .filter_map(|center| ray_sphere(origin, direction, center, self.radius));
        ray_cylinder(origin, direction, self.a, self.b, self.radius)
            .into_iter()
            .chain(caps)
            .min_by(f32::total_cmp)
    }
}

/// Closest point to `p` on segment `ab`.
#[must_use]
pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Squared distance between segments `p1q1` and `p2q2`.
///
/// Follows the clamped closest-point construction from Ericson,
/// *Real-Time Collision Detection*, §5.1.9.
#[must_use]
pub fn segment_segment_distance_squared(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> f32 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    c1.distance_squared(c2)
}

/// Nearest non-negative hit of a unit ray against a sphere surface.
#[must_use]
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let h = b * b - c;
    if h < 0.0 {
        return None;
    }
    let t = -b - h.sqrt();
    (t >= 0.0).then_some(t)
}

/// Hit of a unit ray against the open cylinder around segment `ab`.
///
/// Only hits between the two end planes count; the end caps are spheres
/// handled by [`ray_sphere`].
fn ray_cylinder(origin: Vec3, direction: Vec3, a: Vec3, b: Vec3, radius: f32) -> Option<f32> {
    let ba = b - a;
    let oa = origin - a;
    let baba = ba.length_squared();
    let bard = ba.dot(direction);
    let baoa = ba.dot(oa);
    let rdoa = direction.dot(oa);
    let oaoa = oa.length_squared();

    let k2 = baba - bard * bard;
    if baba <= EPSILON || k2 <= EPSILON * baba {
        return None;
    }
    let k1 = baba * rdoa - baoa * bard;
    let k0 = baba * oaoa - baoa * baoa - radius * radius * baba;
    let h = k1 * k1 - k2 * k0;
    if h < 0.0 {
        return None;
    }
    let t = (-k1 - h.sqrt()) / k2;
    let y = baoa + t * bard;
    (t >= 0.0 && y > 0.0 && y < baba).then_some(t)
}
