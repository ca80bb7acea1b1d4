//! Locomotion state and the per-actor runtime the controller mutates.
//!
//! [`MovementRuntime`] is a small value struct owned solely by its
//! controller. It is reset at fixed points in every tick:
//!
//! - the steering accumulator is zeroed before the state branch runs
//! - the one-shot intents are cleared after the state branch runs
//!
//! Axis values are continuous input and persist until the input source
//! overwrites them.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four mutually exclusive locomotion modes.
///
/// Freshly spawned actors start in `Jumping`: airborne with unknown contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    /// Standing or running on a supporting surface
    Grounding,
    /// Airborne with partial air control
    #[default]
    Jumping,
    /// Mid-dash, pushing anything the capsule touches
    Dashing,
    /// Falling toward a ground slam
    Slamming,
}

impl MovementState {
    /// Returns `true` for the states in which the actor is airborne.
    #[must_use]
    pub const fn is_airborne(self) -> bool {
        !matches!(self, Self::Grounding)
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grounding => write!(f, "Grounding"),
            Self::Jumping => write!(f, "Jumping"),
            Self::Dashing => write!(f, "Dashing"),
            Self::Slamming => write!(f, "Slamming"),
        }
    }
}

/// Desired instantaneous velocity from directional input.
///
/// `forward` maps to world +Z and `right` to world +X.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Steering {
    /// Forward/back component
    pub forward: f32,
    /// Left/right component
    pub right: f32,
}

impl Steering {
    /// World-space velocity delta for this steering.
    #[must_use]
    pub fn as_vector(&self) -> Vec3 {
        Vec3::new(self.right, 0.0, self.forward)
    }

    /// Unit direction of travel, or zero when there is no input.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.as_vector().normalize_or_zero()
    }
}

/// Input buffered between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intents {
    /// One-shot jump request
    pub should_jump: bool,
    /// One-shot dash request
    pub should_dash: bool,
    /// One-shot slam request
    pub should_slam: bool,
    /// Forward/back axis in `[-1, 1]`
    pub vertical_axis: f32,
    /// Left/right axis in `[-1, 1]`
    pub horizontal_axis: f32,
}

impl Intents {
    /// Drops all one-shot requests. Axis values are kept.
    pub fn clear_one_shots(&mut self) {
        self.should_jump = false;
        self.should_dash = false;
        self.should_slam = false;
    }

    /// Returns `true` if any one-shot request is still latched.
    #[must_use]
    pub const fn any_one_shot(&self) -> bool {
        self.should_jump || self.should_dash || self.should_slam
    }
}

/// Mutable per-actor locomotion state.
///
/// # Invariants
///
/// - one-shot intents never survive the end of a step
/// - `have_air_dashed` is only set while airborne since the last landing
/// - `dash_timer` is zero whenever `state != Dashing`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementRuntime {
    pub(crate) state: MovementState,
    pub(crate) steering: Steering,
    pub(crate) intents: Intents,
    pub(crate) have_air_dashed: bool,
    pub(crate) dash_timer: f32,
}

impl MovementRuntime {
    /// Creates the spawn-time runtime: airborne, no input, no latches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current locomotion state.
    #[must_use]
    pub const fn state(&self) -> MovementState {
        self.state
    }

    /// Steering accumulator built during the last step.
    #[must_use]
    pub const fn steering(&self) -> Steering {
        self.steering
    }

    /// Buffered input.
    #[must_use]
    pub const fn intents(&self) -> &Intents {
        &self.intents
    }

    /// Whether the aerial dash has been spent since the last landing.
    #[must_use]
    pub const fn have_air_dashed(&self) -> bool {
        self.have_air_dashed
    }

    /// Seconds elapsed in the current dash.
    #[must_use]
    pub const fn dash_timer(&self) -> f32 {
        self.dash_timer
    }
}
