//! # Rumble Sandbox
//!
//! A small deterministic rigid-body world for driving
//! [`rumble_core::MovementController`]s without a game engine.
//!
//! The sandbox implements the three collaborator traits the controller
//! needs (`PhysicsWorld`, `StatStore`, `BoundsProvider`) over a flat floor
//! and a set of sphere and capsule bodies. It is meant for demos, benchmarks
//! and end-to-end tests, not for shipping gameplay physics.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rumble_sandbox::{ActorSpawn, Arena, ArenaConfig};
//!
//! let mut arena = Arena::new(ArenaConfig::default())?;
//! let left = arena.spawn_actor(ActorSpawn::standing_at(-2.0, 0.0))?;
//! let right = arena.spawn_actor(ActorSpawn::standing_at(2.0, 0.0))?;
//!
//! arena.controller_mut(left).unwrap().request_move_right(1.0);
//! arena.run(25);
//! arena.controller_mut(left).unwrap().request_dash();
//! arena.run(25);
//!
//! println!("{:?}", arena.snapshot());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod body;
pub mod error;
pub mod geometry;
pub mod hash;
pub mod world;

// Re-exports for convenience
pub use arena::{ActorSnapshot, ActorSpawn, Arena, ArenaConfig, ArenaSnapshot};
pub use body::{Body, BodyKind, Collider};
pub use error::SandboxError;
pub use geometry::{Bounds, SweptSphere};
pub use hash::{hash_arena, hash_world};
pub use world::{SandboxConfig, SandboxWorld, FLOOR};
