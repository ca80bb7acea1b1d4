//! Sandbox error type.

use rumble_core::{AttachError, EntityId};
use thiserror::Error;

/// Errors raised while building or driving a sandbox arena.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SandboxError {
    /// A world or arena setting is out of range.
    #[error("invalid sandbox setting `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending setting
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
    /// A spawn request describes an unusable body.
    #[error("invalid body: {0}")]
    InvalidBody(&'static str),
    /// No body with this id exists.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// A controller refused to attach.
    #[error(transparent)]
    Attach(#[from] AttachError),
}
