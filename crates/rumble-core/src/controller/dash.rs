//! Dash impulse and dash contact pushes.

use glam::Vec3;
use tracing::{trace, warn};

use super::MovementController;
use crate::config::DashHitPolicy;
use crate::events::{ImpactKind, MovementEvent};
use crate::world::{ActorWorld, ForceMode};

impl MovementController {
    /// Launches the actor along its current steering direction.
    ///
    /// With no directional input the impulse is zero and the dash only
    /// changes state.
    pub(super) fn dash_impulse<W: ActorWorld + ?Sized>(&self, world: &mut W) {
        let impulse = self.runtime.steering.direction() * self.config.speed_dash;
        trace!(entity = %self.entity, ?impulse, "dash impulse");
        world.apply_force(self.entity, impulse, ForceMode::VelocityChange);
    }

    /// Pushes and damages every other actor overlapping the dashing capsule.
    ///
    /// Push strength scales with the dasher's current speed, so a dash that
    /// has been slowed by collisions hits softer.
    pub(super) fn resolve_dash_contacts<W: ActorWorld + ?Sized>(&mut self, world: &mut W) {
        let Some(pose) = world.pose(self.entity) else {
            warn!(entity = %self.entity, "no pose for dash contacts");
            return;
        };
        let (bottom, top) = self.capsule.segment(&pose);
        let radius = self
            .capsule
            .world_radius(&pose, self.config.ground_check_percent);
        let contacts = world.overlap_capsule(bottom, top, radius, self.config.actor_layers);
        if contacts.iter().all(|hit| hit.entity == self.entity) {
            return;
        }

        let Some(origin) = world.lowest_point(self.entity) else {
            warn!(entity = %self.entity, "no bounds for dash contacts");
            return;
        };
        let Some(attacker) = self.attacker(world) else {
            return;
        };
        let speed = world.velocity(self.entity).map_or(0.0, Vec3::length);
        let raw = self.config.dash_push * speed;

        for hit in contacts {
            let target = hit.entity;
            if target == self.entity {
                continue;
            }
            if self.config.dash_hit_policy == DashHitPolicy::OncePerTarget
                && self.dash_victims.contains(&target)
            {
                trace!(entity = %self.entity, %target, "already hit by this dash");
                continue;
            }
            if !world.has_rigid_body(target) {
                trace!(entity = %self.entity, %target, "dash contact has no rigid body");
                continue;
            }
            let Some(center) = world.bounds_center(target) else {
                warn!(entity = %self.entity, %target, "dash target has no bounds");
                continue;
            };
            let Some(impact) = self.resolve_impact(
                world,
                ImpactKind::Dash,
                &attacker,
                origin,
                target,
                center,
                raw,
            ) else {
                continue;
            };

            world.apply_force(target, impact.push, ForceMode::VelocityChange);
            world.add_rage(target, impact.damage);
            if self.config.dash_hit_policy == DashHitPolicy::OncePerTarget {
                self.dash_victims.push(target);
            }
            self.emit(&MovementEvent::ImpactApplied(impact));
        }
    }
}
