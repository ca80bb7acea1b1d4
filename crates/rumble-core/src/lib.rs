//! # Rumble Core
//!
//! Locomotion and melee impacts for physics-driven brawler actors.
//!
//! Each actor gets a [`MovementController`]: a four-state machine
//! (`Grounding`, `Jumping`, `Dashing`, `Slamming`) that turns buffered
//! intents into forces on the actor's rigid body once per fixed step. Dashes
//! and slams push and enrage nearby actors through the pure formulas in
//! [`ImpactResolver`].
//!
//! ## Architecture
//!
//! - **Controller**: owns state, intents and timers; nothing else
//! - **Collaborators**: physics, stats and bounds are injected through the
//!   traits in [`world`], keyed by [`EntityId`]
//! - **Resolvers**: stateless push/damage math
//! - **Observers**: per-controller listeners for transitions and impacts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rumble_core::{ActorMovementConfig, CapsuleShape, EventLog, MovementController};
//!
//! let mut controller = MovementController::attach(
//!     actor,
//!     ActorMovementConfig::default(),
//!     CapsuleShape::default(),
//!     &world,
//! )?;
//! controller.add_observer(EventLog::new());
//!
//! controller.request_move_forward(1.0);
//! controller.request_jump();
//! controller.step(1.0 / 50.0, &mut world);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod events;
pub mod resolver;
pub mod state;
pub mod world;

#[cfg(test)]
mod tests;

pub use config::{ActorMovementConfig, DashHitPolicy, SlamEntry};
pub use controller::MovementController;
pub use entity::{CapsuleShape, EntityId, Pose};
pub use error::{AttachError, ConfigError, ImpactError};
pub use events::{ChannelObserver, EventLog, Impact, ImpactKind, MovementEvent, MovementObserver};
pub use resolver::{Combatant, ImpactResolver};
pub use state::{Intents, MovementRuntime, MovementState, Steering};
pub use world::{
    ActorWorld, BoundsProvider, ColliderHit, ForceMode, LayerMask, PhysicsWorld, RayHit, StatStore,
};
