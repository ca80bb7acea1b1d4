//! Per-actor movement tunables.
//!
//! [`ActorMovementConfig`] is immutable once a controller is attached. It
//! deserializes with every field optional, falling back to the stock tuning,
//! so content files only need to list what they override.
//!
//! # Example
//!
//! ```
//! use rumble_core::config::{ActorMovementConfig, DashHitPolicy};
//!
//! let config = ActorMovementConfig::default()
//!     .with_max_speed(5.0)
//!     .with_dash_hit_policy(DashHitPolicy::OncePerTarget);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.speed_jump, 8.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::world::LayerMask;

/// How often a single dash may push the same target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashHitPolicy {
    /// Push and damage every tick the target overlaps the dashing capsule.
    #[default]
    EveryTick,
    /// Push and damage each target at most once per dash.
    OncePerTarget,
}

/// What happens to the slammer's own body when a slam is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlamEntry {
    /// Keep falling under existing momentum.
    #[default]
    Coast,
    /// Add a downward velocity change of `speed_slam`.
    Dive,
}

/// Immutable locomotion and impact tunables for one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorMovementConfig {
    /// Ground speed per unit of forward axis input
    pub speed_forward_min: f32,
    /// Ground speed per unit of lateral axis input
    pub speed_right_min: f32,
    /// Steering is only re-applied while body speed is below this
    pub max_speed: f32,
    /// Upward velocity change of a jump
    pub speed_jump: f32,
    /// Velocity change of a dash along the steering direction
    pub speed_dash: f32,
    /// Dash push strength per unit of dasher speed
    pub dash_push: f32,
    /// Seconds a dash lasts before returning to the air
    pub dash_cool_down: f32,
    /// Downward velocity change used by [`SlamEntry::Dive`]
    pub speed_slam: f32,
    /// Reach of the slam shockwave
    pub slam_radius: f32,
    /// Targets whose bounds center is higher than this above the slammer's feet are spared
    pub slam_height_limit: f32,
    /// Slam push magnitude at zero distance
    pub slam_impact_speed_max: f32,
    /// Fraction of forward steering available in the air
    pub air_control_forward: f32,
    /// Fraction of lateral steering available in the air
    pub air_control_right: f32,
    /// Damage multiplier for hits dealt by this actor
    pub attack_mod: f32,
    /// Capsule inflation used by the ground and dash overlap queries
    pub ground_check_percent: f32,
    /// Layers occupied by other actors; the ground probe uses the complement
    pub actor_layers: LayerMask,
    /// Length of the downward ground ray
    pub ground_probe_distance: f32,
    /// Most colliders a slam will consider
    pub slam_max_targets: usize,
    /// Repeated-contact rule for dashes
    pub dash_hit_policy: DashHitPolicy,
    /// Entry behaviour for slams
    pub slam_entry: SlamEntry,
}

impl Default for ActorMovementConfig {
    fn default() -> Self {
        Self {
            speed_forward_min: 0.5,
            speed_right_min: 0.5,
            max_speed: 3.0,
            speed_jump: 8.0,
            speed_dash: 10.0,
            dash_push: 2.0,
            dash_cool_down: 0.5,
            speed_slam: 20.0,
            slam_radius: 20.0,
            slam_height_limit: 2.0,
            slam_impact_speed_max: 100.0,
            air_control_forward: 0.5,
            air_control_right: 0.5,
            attack_mod: 1.0,
            ground_check_percent: 1.1,
            actor_layers: LayerMask::ACTOR,
            ground_probe_distance: 10.0,
            slam_max_targets: 4,
            dash_hit_policy: DashHitPolicy::EveryTick,
            slam_entry: SlamEntry::Coast,
        }
    }
}

impl ActorMovementConfig {
    /// Sets the steering re-application threshold.
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Sets ground steering speeds for both axes.
    #[must_use]
    pub fn with_ground_speeds(mut self, forward: f32, right: f32) -> Self {
        self.speed_forward_min = forward;
        self.speed_right_min = right;
        self
    }

    /// Sets the fraction of steering available while airborne.
    #[must_use]
    pub fn with_air_control(mut self, forward: f32, right: f32) -> Self {
        self.air_control_forward = forward;
        self.air_control_right = right;
        self
    }

    /// Sets dash speed, push strength and duration.
    #[must_use]
    pub fn with_dash(mut self, speed: f32, push: f32, cool_down: f32) -> Self {
        self.speed_dash = speed;
        self.dash_push = push;
        self.dash_cool_down = cool_down;
        self
    }

    /// Sets slam reach, height cutoff and peak impact.
    #[must_use]
    pub fn with_slam(mut self, radius: f32, height_limit: f32, impact_speed_max: f32) -> Self {
        self.slam_radius = radius;
        self.slam_height_limit = height_limit;
        self.slam_impact_speed_max = impact_speed_max;
        self
    }

    /// Sets the damage multiplier.
    #[must_use]
    pub fn with_attack_mod(mut self, attack_mod: f32) -> Self {
        self.attack_mod = attack_mod;
        self
    }

    /// Sets the other-actor collision layers.
    #[must_use]
    pub fn with_actor_layers(mut self, layers: LayerMask) -> Self {
        self.actor_layers = layers;
        self
    }

    /// Sets the repeated-contact rule for dashes.
    #[must_use]
    pub fn with_dash_hit_policy(mut self, policy: DashHitPolicy) -> Self {
        self.dash_hit_policy = policy;
        self
    }

    /// Sets the slam entry behaviour.
    #[must_use]
    pub fn with_slam_entry(mut self, entry: SlamEntry) -> Self {
        self.slam_entry = entry;
        self
    }

    /// Checks every tunable against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in field declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("speed_forward_min", self.speed_forward_min)?;
        check_non_negative("speed_right_min", self.speed_right_min)?;
        check_non_negative("max_speed", self.max_speed)?;
        check_non_negative("speed_jump", self.speed_jump)?;
        check_non_negative("speed_dash", self.speed_dash)?;
        check_non_negative("dash_push", self.dash_push)?;
        check_non_negative("dash_cool_down", self.dash_cool_down)?;
        check_non_negative("speed_slam", self.speed_slam)?;
        check_positive("slam_radius", self.slam_radius)?;
        check_finite("slam_height_limit", self.slam_height_limit)?;
        check_non_negative("slam_impact_speed_max", self.slam_impact_speed_max)?;
        check_non_negative("air_control_forward", self.air_control_forward)?;
        check_non_negative("air_control_right", self.air_control_right)?;
        check_non_negative("attack_mod", self.attack_mod)?;
        check_positive("ground_check_percent", self.ground_check_percent)?;
        check_positive("ground_probe_distance", self.ground_probe_distance)?;
        if self.slam_max_targets == 0 {
            return Err(ConfigError::NoSlamCapacity);
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
