//! The per-actor locomotion state machine.
//!
//! A [`MovementController`] turns buffered intents into forces on its actor's
//! rigid body. Each call to [`MovementController::step`] runs, in order:
//!
//! 1. zero the steering accumulator
//! 2. run the branch for the current [`MovementState`]
//! 3. clear the one-shot intents, consumed or not
//! 4. apply steering as a velocity change if the body is below `max_speed`
//!
//! ```text
//! Grounding ──(ground lost | jump)──► Jumping
//! Grounding ──(dash)───────────────► Dashing
//! Jumping ───(landed)──────────────► Grounding
//! Jumping ───(slam)────────────────► Slamming
//! Jumping ───(dash, once per air)──► Dashing
//! Dashing ───(dash_cool_down)──────► Jumping
//! Slamming ──(landed, shockwave)───► Jumping
//! ```
//!
//! Dashes and slams push other actors through [`ImpactResolver`]; every
//! resolved hit is reported to observers as
//! [`MovementEvent::ImpactApplied`].

mod dash;
mod ground;
mod slam;

pub use ground::is_grounded;

use std::fmt;

use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::config::{ActorMovementConfig, SlamEntry};
use crate::entity::{CapsuleShape, EntityId};
use crate::error::AttachError;
use crate::events::{Impact, ImpactKind, MovementEvent, MovementObserver};
use crate::resolver::{Combatant, ImpactResolver};
use crate::state::{MovementRuntime, MovementState, Steering};
use crate::world::{ActorWorld, ForceMode, PhysicsWorld, StatStore};

/// Drives one actor's locomotion.
///
/// A controller is not reentrant: step it at most once per tick and never
/// from two threads at once. Different actors' controllers are independent.
pub struct MovementController {
    entity: EntityId,
    config: ActorMovementConfig,
    capsule: CapsuleShape,
    runtime: MovementRuntime,
    /// Targets already hit by the current dash (`OncePerTarget` only)
    dash_victims: Vec<EntityId>,
    observers: Vec<Box<dyn MovementObserver>>,
}

impl fmt::Debug for MovementController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovementController")
            .field("entity", &self.entity)
            .field("state", &self.runtime.state)
            .field("runtime", &self.runtime)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl MovementController {
    /// Binds a controller to `entity`.
    ///
    /// The actor starts in [`MovementState::Jumping`] with no buffered input.
    ///
    /// # Errors
    ///
    /// - [`AttachError::Config`] if `config` fails validation
    /// - [`AttachError::InvalidCapsule`] if `capsule` is degenerate
    /// - [`AttachError::MissingRigidBody`], [`AttachError::MissingStats`] or
    ///   [`AttachError::MissingBounds`] if the world cannot serve the actor
    pub fn attach<W: ActorWorld + ?Sized>(
        entity: EntityId,
        config: ActorMovementConfig,
        capsule: CapsuleShape,
        world: &W,
    ) -> Result<Self, AttachError> {
        config.validate()?;
        capsule.validate()?;

        if !world.has_rigid_body(entity)
            || world.pose(entity).is_none()
            || world.velocity(entity).is_none()
        {
            return Err(AttachError::MissingRigidBody(entity));
        }
        if world.mass(entity).is_none() || world.rage(entity).is_none() {
            return Err(AttachError::MissingStats(entity));
        }
        if world.bounds_center(entity).is_none() || world.bounds_extents_magnitude(entity).is_none()
        {
            return Err(AttachError::MissingBounds(entity));
        }

        debug!(%entity, "movement controller attached");
        Ok(Self {
            entity,
            config,
            capsule,
            runtime: MovementRuntime::new(),
            dash_victims: Vec::new(),
            observers: Vec::new(),
        })
    }

    /// Registers an observer for transitions and impacts.
    pub fn add_observer(&mut self, observer: impl MovementObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Returns the actor this controller drives.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Returns the tunables this controller was attached with.
    #[must_use]
    pub const fn config(&self) -> &ActorMovementConfig {
        &self.config
    }

    /// Returns the actor's capsule collider.
    #[must_use]
    pub const fn capsule(&self) -> &CapsuleShape {
        &self.capsule
    }

    /// Returns the mutable runtime for inspection.
    #[must_use]
    pub const fn runtime(&self) -> &MovementRuntime {
        &self.runtime
    }

    /// Returns the active locomotion state.
    #[must_use]
    pub const fn current_state(&self) -> MovementState {
        self.runtime.state
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Sets the forward/back axis, clamped to `[-1, 1]`. NaN reads as zero.
    pub fn request_move_forward(&mut self, axis: f32) {
        self.runtime.intents.vertical_axis = sanitize_axis(axis);
    }

    /// Sets the left/right axis, clamped to `[-1, 1]`. NaN reads as zero.
    pub fn request_move_right(&mut self, axis: f32) {
        self.runtime.intents.horizontal_axis = sanitize_axis(axis);
    }

    /// Latches a jump for the next step.
    pub fn request_jump(&mut self) {
        self.runtime.intents.should_jump = true;
    }

    /// Latches a dash for the next step.
    pub fn request_dash(&mut self) {
        self.runtime.intents.should_dash = true;
    }

    /// Latches a slam for the next step.
    pub fn request_slam(&mut self) {
        self.runtime.intents.should_slam = true;
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advances the state machine by one fixed step of `dt` seconds.
    ///
    /// Never fails. Missing collaborator data is logged and the affected
    /// action is skipped for this step.
    pub fn step<W: ActorWorld + ?Sized>(&mut self, dt: f32, world: &mut W) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(entity = %self.entity, dt, "invalid step duration, treating as zero");
            0.0
        };

        self.runtime.steering = Steering::default();

        match self.runtime.state {
            MovementState::Grounding => self.step_grounding(world),
            MovementState::Jumping => self.step_jumping(world),
            MovementState::Dashing => self.step_dashing(dt, world),
            MovementState::Slamming => self.step_slamming(world),
        }

        self.runtime.intents.clear_one_shots();
        self.apply_steering(world);
    }

    /// Runs the two-phase ground check for this actor.
    #[must_use]
    pub fn is_grounded<W: PhysicsWorld + ?Sized>(&self, world: &W) -> bool {
        is_grounded(world, self.entity, &self.capsule, &self.config)
    }

    fn step_grounding<W: ActorWorld + ?Sized>(&mut self, world: &mut W) {
        let intents = self.runtime.intents;
        self.runtime.steering = Steering {
            forward: intents.vertical_axis * self.config.speed_forward_min,
            right: intents.horizontal_axis * self.config.speed_right_min,
        };

        if !self.is_grounded(world) {
            self.transition(MovementState::Jumping);
        } else if intents.should_jump {
            world.apply_force(
                self.entity,
                Vec3::Y * self.config.speed_jump,
                ForceMode::VelocityChange,
            );
            self.transition(MovementState::Jumping);
        } else if intents.should_dash {
            self.dash_impulse(world);
            self.transition(MovementState::Dashing);
        }
    }

    fn step_jumping<W: ActorWorld + ?Sized>(&mut self, world: &mut W) {
        let intents = self.runtime.intents;
        self.runtime.steering = Steering {
            forward: intents.vertical_axis
                * self.config.speed_forward_min
                * self.config.air_control_forward,
            right: intents.horizontal_axis
                * self.config.speed_right_min
                * self.config.air_control_right,
        };

        if self.is_grounded(world) {
            self.runtime.have_air_dashed = false;
            self.transition(MovementState::Grounding);
        } else if intents.should_slam {
            if self.config.slam_entry == SlamEntry::Dive {
                world.apply_force(
                    self.entity,
                    Vec3::NEG_Y * self.config.speed_slam,
                    ForceMode::VelocityChange,
                );
            }
            self.transition(MovementState::Slamming);
        } else if intents.should_dash && !self.runtime.have_air_dashed {
            self.dash_impulse(world);
            self.runtime.have_air_dashed = true;
            self.transition(MovementState::Dashing);
        }
    }

    fn step_dashing<W: ActorWorld + ?Sized>(&mut self, dt: f32, world: &mut W) {
        self.runtime.dash_timer += dt;
        if self.runtime.dash_timer > self.config.dash_cool_down {
            self.runtime.dash_timer = 0.0;
            self.transition(MovementState::Jumping);
        }
        // The final tick of a dash still hits whatever it touches.
        self.resolve_dash_contacts(world);
    }

    fn step_slamming<W: ActorWorld + ?Sized>(&mut self, world: &mut W) {
        if self.is_grounded(world) {
            self.resolve_slam(world);
            self.transition(MovementState::Jumping);
        }
    }

    fn apply_steering<W: ActorWorld + ?Sized>(&self, world: &mut W) {
        let delta = self.runtime.steering.as_vector();
        if delta == Vec3::ZERO {
            return;
        }
        let Some(velocity) = world.velocity(self.entity) else {
            warn!(entity = %self.entity, "no velocity for steering");
            return;
        };
        if velocity.length() < self.config.max_speed {
            world.apply_force(self.entity, delta, ForceMode::VelocityChange);
        } else {
            trace!(entity = %self.entity, speed = velocity.length(), "steering suppressed above max speed");
        }
    }

    // =========================================================================
    // Transitions and notifications
    // =========================================================================

    fn transition(&mut self, next: MovementState) {
        let previous = self.runtime.state;
        if previous == next {
            return;
        }
        if previous == MovementState::Dashing {
            self.runtime.dash_timer = 0.0;
        }
        if next == MovementState::Dashing {
            self.dash_victims.clear();
        }
        self.runtime.state = next;

        debug!(entity = %self.entity, from = %previous, to = %next, "movement transition");
        self.emit(&MovementEvent::Exited {
            entity: self.entity,
            state: previous,
        });
        self.emit(&MovementEvent::Entered {
            entity: self.entity,
            state: next,
        });
    }

    fn emit(&mut self, event: &MovementEvent) {
        for observer in &mut self.observers {
            observer.notify(event);
        }
    }

    // =========================================================================
    // Impact plumbing shared by dash and slam
    // =========================================================================

    /// Snapshot of this actor's stats as the attacking side.
    fn attacker<W: StatStore + ?Sized>(&self, world: &W) -> Option<Combatant> {
        let (Some(rage), Some(mass)) = (world.rage(self.entity), world.mass(self.entity)) else {
            warn!(entity = %self.entity, "attacker has no stats, skipping impacts");
            return None;
        };
        let attack_mod = world
            .attack_mod(self.entity)
            .unwrap_or(self.config.attack_mod);
        Some(Combatant::new(rage, mass, attack_mod))
    }

    /// Resolves push and damage of one hit, or `None` if the target cannot be
    /// pushed or the result is not finite.
    #[allow(clippy::too_many_arguments)]
    fn resolve_impact<W: StatStore + ?Sized>(
        &self,
        world: &W,
        kind: ImpactKind,
        attacker: &Combatant,
        origin: Vec3,
        target: EntityId,
        target_center: Vec3,
        raw: f32,
    ) -> Option<Impact> {
        let (Some(rage), Some(mass)) = (world.rage(target), world.mass(target)) else {
            warn!(entity = %self.entity, %target, "impact target has no stats");
            return None;
        };
        let defender = Combatant::new(rage, mass, world.attack_mod(target).unwrap_or(1.0));
        let modifier = match ImpactResolver::push_modifier(attacker, &defender) {
            Ok(modifier) => modifier,
            Err(err) => {
                warn!(entity = %self.entity, %target, %err, "skipping impact");
                return None;
            }
        };

        let direction = (target_center - origin).normalize_or_zero();
        let impact = Impact {
            kind,
            attacker: self.entity,
            target,
            push: direction * raw * modifier,
            damage: ImpactResolver::damage(raw, attacker),
        };
        if !impact.push.is_finite() || !impact.damage.is_finite() {
            warn!(
                entity = %self.entity,
                %target,
                push = ?impact.push,
                damage = impact.damage,
                "skipping non-finite impact"
            );
            return None;
        }
        trace!(
            entity = %self.entity,
            %target,
            %kind,
            push = ?impact.push,
            damage = impact.damage,
            "impact resolved"
        );
        Some(impact)
    }
}

fn sanitize_axis(axis: f32) -> f32 {
    if axis.is_nan() {
        0.0
    } else {
        axis.clamp(-1.0, 1.0)
    }
}
