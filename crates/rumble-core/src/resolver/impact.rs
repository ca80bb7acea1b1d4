//! Push and damage formulas shared by dashes and slams.
//!
//! Rage is a percentage with no upper bound. It amplifies everything an actor
//! deals and everything it receives:
//!
//! ```text
//! push_modifier = (1 + target.rage / 100) * (1 + attacker.rage / 100) / target.mass
//! damage        = (1 + attacker.rage / 100) * raw * attacker.attack_mod
//! ```
//!
//! # Example
//!
//! ```
//! use rumble_core::resolver::{Combatant, ImpactResolver};
//!
//! let attacker = Combatant::new(50.0, 1.0, 1.0);
//! let target = Combatant::new(0.0, 2.0, 1.0);
//!
//! assert_eq!(ImpactResolver::damage(10.0, &attacker), 15.0);
//! assert_eq!(ImpactResolver::push_modifier(&attacker, &target), Ok(0.75));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ImpactError;

/// Stat snapshot of one side of an impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Rage percentage
    pub rage: f32,
    /// Rigid-body mass
    pub mass: f32,
    /// Outgoing damage multiplier
    pub attack_mod: f32,
}

impl Combatant {
    /// Creates a snapshot from raw stats.
    #[must_use]
    pub const fn new(rage: f32, mass: f32, attack_mod: f32) -> Self {
        Self {
            rage,
            mass,
            attack_mod,
        }
    }

    /// Multiplier contributed by this combatant's rage.
    #[must_use]
    pub fn rage_factor(&self) -> f32 {
        1.0 + self.rage / 100.0
    }
}

/// Stateless push, damage and falloff formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactResolver;

impl ImpactResolver {
    /// Scalar applied to a push vector before it reaches `target`.
    ///
    /// Increases with either side's rage, decreases with target mass.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::InvalidMass`] if the target mass is zero,
    /// negative or non-finite.
    pub fn push_modifier(attacker: &Combatant, target: &Combatant) -> Result<f32, ImpactError> {
        if !(target.mass.is_finite() && target.mass > 0.0) {
            return Err(ImpactError::InvalidMass(target.mass));
        }
        Ok(target.rage_factor() * attacker.rage_factor() / target.mass)
    }

    /// Rage added to a target hit with raw impact `raw`.
    ///
    /// Linear in `raw` and in the attacker's attack modifier. Target stats do
    /// not participate.
    #[must_use]
    pub fn damage(raw: f32, attacker: &Combatant) -> f32 {
        attacker.rage_factor() * raw * attacker.attack_mod
    }

    /// Linear falloff of slam strength: 1 at the epicenter, 0 at `radius` and
    /// beyond.
    ///
    /// `radius` must be positive; a validated config guarantees it.
    #[must_use]
    pub fn slam_falloff(distance: f32, radius: f32) -> f32 {
        ((radius - distance) / radius).clamp(0.0, 1.0)
    }
}
