//! Slam landing shockwave.
//!
//! Candidates come from a sphere query around the slammer's origin, capped at
//! `slam_max_targets`. Overlaps beyond the cap are ignored, not reported.
//! Targets whose bounds center sits higher than `slam_height_limit` above the
//! slammer's lowest point are spared.

use tracing::{debug, trace, warn};

use super::MovementController;
use crate::events::{ImpactKind, MovementEvent};
use crate::resolver::ImpactResolver;
use crate::world::{ActorWorld, ForceMode};

impl MovementController {
    pub(super) fn resolve_slam<W: ActorWorld + ?Sized>(&mut self, world: &mut W) {
        let Some(pose) = world.pose(self.entity) else {
            warn!(entity = %self.entity, "no pose for slam");
            return;
        };
        let Some(origin) = world.lowest_point(self.entity) else {
            warn!(entity = %self.entity, "no bounds for slam");
            return;
        };

        let max_targets = self.config.slam_max_targets;
        let radius = self.config.slam_radius;
        let candidates =
            world.overlap_sphere(pose.position, radius, self.config.actor_layers, max_targets);
        debug!(entity = %self.entity, candidates = candidates.len(), "slam landed");
        if candidates.is_empty() {
            return;
        }

        let Some(attacker) = self.attacker(world) else {
            return;
        };
        let ceiling = origin.y + self.config.slam_height_limit;

        for hit in candidates.into_iter().take(max_targets) {
            let target = hit.entity;
            if target == self.entity {
                continue;
            }
            if !world.has_rigid_body(target) {
                trace!(entity = %self.entity, %target, "slam candidate has no rigid body");
                continue;
            }
            let Some(center) = world.bounds_center(target) else {
                warn!(entity = %self.entity, %target, "slam target has no bounds");
                continue;
            };
            if center.y > ceiling {
                trace!(entity = %self.entity, %target, "slam target above height limit");
                continue;
            }

            let distance = center.distance(origin);
            let magnitude =
                self.config.slam_impact_speed_max * ImpactResolver::slam_falloff(distance, radius);
            let Some(impact) = self.resolve_impact(
                world,
                ImpactKind::Slam,
                &attacker,
                origin,
                target,
                center,
                magnitude,
            ) else {
                continue;
            };

            world.apply_force(target, impact.push, ForceMode::Force);
            world.add_rage(target, impact.damage);
            self.emit(&MovementEvent::ImpactApplied(impact));
        }
    }
}
