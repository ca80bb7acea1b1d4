//! Impact resolution for dash and slam contacts.
//!
//! Resolvers here are pure: they take snapshots of the two participants and
//! return magnitudes. They never touch a world, so the same inputs always
//! produce bit-identical outputs.
//!
//! # Available Resolvers
//!
//! - [`ImpactResolver`]: push scaling, damage and slam distance falloff

mod impact;

pub use impact::{Combatant, ImpactResolver};
