//! Error types for controller attachment, configuration and impact math.
//!
//! Stepping a controller never fails: missing collaborator data during a tick
//! is logged and the affected target is skipped. Errors surface only where a
//! caller can act on them, at attach time and from the pure impact formulas.

use thiserror::Error;

use crate::entity::EntityId;

/// A tunable in [`ActorMovementConfig`](crate::config::ActorMovementConfig)
/// is out of range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A tunable is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field
        field: &'static str,
        /// Value supplied
        value: f32,
    },
    /// A tunable that scales speeds or durations is negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending field
        field: &'static str,
        /// Value supplied
        value: f32,
    },
    /// A tunable that divides or sizes a volume is zero or negative.
    #[error("`{field}` must be positive, got {value}")]
    NotPositive {
        /// Name of the offending field
        field: &'static str,
        /// Value supplied
        value: f32,
    },
    /// The slam query would never return a target.
    #[error("`slam_max_targets` must be at least 1")]
    NoSlamCapacity,
}

/// A controller could not be attached to its actor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttachError {
    /// The physics world has no rigid body for the actor.
    #[error("entity {0} has no rigid body")]
    MissingRigidBody(EntityId),
    /// The stat store has no mass or rage for the actor.
    #[error("entity {0} has no stats")]
    MissingStats(EntityId),
    /// The bounds provider has no bounds for the actor.
    #[error("entity {0} has no render bounds")]
    MissingBounds(EntityId),
    /// The capsule descriptor is degenerate.
    #[error("invalid capsule shape: {0}")]
    InvalidCapsule(&'static str),
    /// The movement config failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An impact formula received inputs outside its contract.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ImpactError {
    /// Push scaling divides by target mass, which must be positive.
    #[error("target mass must be positive and finite, got {0}")]
    InvalidMass(f32),
}
