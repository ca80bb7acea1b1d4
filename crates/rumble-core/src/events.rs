//! Notifications a controller emits while stepping.
//!
//! Every controller owns its own observer list; there are no process-wide
//! event hooks. The composing application injects observers with
//! [`MovementController::add_observer`](crate::controller::MovementController::add_observer).
//!
//! Observers are fire-and-forget: they receive a borrowed [`MovementEvent`],
//! return nothing, and must not block the tick.
//!
//! # Provided Observers
//!
//! - any `FnMut(&MovementEvent) + Send` closure
//! - [`EventLog`]: shared in-memory recorder, drained with `take_events()`
//! - [`ChannelObserver`]: forwards clones into an `mpsc` channel
//!
//! # Example
//!
//! ```
//! use rumble_core::entity::EntityId;
//! use rumble_core::events::{EventLog, MovementEvent, MovementObserver};
//! use rumble_core::state::MovementState;
//!
//! let log = EventLog::new();
//! let mut observer = log.clone();
//!
//! observer.notify(&MovementEvent::Entered {
//!     entity: EntityId::new(1),
//!     state: MovementState::Grounding,
//! });
//!
//! assert_eq!(log.take_events().len(), 1);
//! assert!(log.is_empty());
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::entity::EntityId;
use crate::state::MovementState;

/// Which move produced an impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactKind {
    /// Capsule contact during a dash (velocity change)
    Dash,
    /// Shockwave on slam landing (continuous force)
    Slam,
}

impl fmt::Display for ImpactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dash => write!(f, "Dash"),
            Self::Slam => write!(f, "Slam"),
        }
    }
}

/// A resolved push against one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    /// Move that produced the impact
    pub kind: ImpactKind,
    /// Actor that dashed or slammed
    pub attacker: EntityId,
    /// Actor that was pushed
    pub target: EntityId,
    /// Vector handed to the physics world
    pub push: Vec3,
    /// Rage added to the target
    pub damage: f32,
}

/// Something that happened during a controller step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    /// The actor left `state`.
    Exited {
        /// Actor whose state changed
        entity: EntityId,
        /// State being left
        state: MovementState,
    },
    /// The actor entered `state`.
    Entered {
        /// Actor whose state changed
        entity: EntityId,
        /// State being entered
        state: MovementState,
    },
    /// A dash or slam pushed and damaged a target.
    ImpactApplied(Impact),
}

impl MovementEvent {
    /// Returns the actor that emitted this event.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        match self {
            Self::Exited { entity, .. } | Self::Entered { entity, .. } => *entity,
            Self::ImpactApplied(impact) => impact.attacker,
        }
    }

    /// Returns the impact payload, if this is an impact event.
    #[must_use]
    pub const fn as_impact(&self) -> Option<&Impact> {
        match self {
            Self::ImpactApplied(impact) => Some(impact),
            _ => None,
        }
    }
}

/// Receiver of controller notifications.
pub trait MovementObserver: Send {
    /// Called synchronously from within the step that produced `event`.
    fn notify(&mut self, event: &MovementEvent);
}

impl<F> MovementObserver for F
where
    F: FnMut(&MovementEvent) + Send,
{
    fn notify(&mut self, event: &MovementEvent) {
        self(event);
    }
}

/// Shared in-memory event recorder.
///
/// Clones share the same log, so one clone can be handed to a controller
/// while another is kept to drain events after each tick.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MovementEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns all recorded events in emission order.
    pub fn take_events(&self) -> Vec<MovementEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panicking observer elsewhere cannot corrupt a Vec push.
    fn lock(&self) -> MutexGuard<'_, Vec<MovementEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MovementObserver for EventLog {
    fn notify(&mut self, event: &MovementEvent) {
        self.lock().push(event.clone());
    }
}

/// Forwards events into an `mpsc` channel.
///
/// Sends to a disconnected receiver are dropped silently.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: Sender<MovementEvent>,
}

impl ChannelObserver {
    /// Wraps the sending half of a channel.
    #[must_use]
    pub fn new(sender: Sender<MovementEvent>) -> Self {
        Self { sender }
    }
}

impl MovementObserver for ChannelObserver {
    fn notify(&mut self, event: &MovementEvent) {
        self.sender.send(event.clone()).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn entered(id: u64, state: MovementState) -> MovementEvent {
        MovementEvent::Entered {
            entity: EntityId::new(id),
            state,
        }
    }

    mod event_tests {
        use super::*;

        #[test]
        fn source_of_transition_is_entity() {
            assert_eq!(entered(4, MovementState::Dashing).source(), EntityId::new(4));
        }

        #[test]
        fn source_of_impact_is_attacker() {
            let event = MovementEvent::ImpactApplied(Impact {
                kind: ImpactKind::Slam,
                attacker: EntityId::new(1),
                target: EntityId::new(2),
                push: Vec3::X,
                damage: 3.0,
            });
            assert_eq!(event.source(), EntityId::new(1));
            assert_eq!(event.as_impact().map(|i| i.target), Some(EntityId::new(2)));
        }

        #[test]
        fn serialization_roundtrip() {
            let event = entered(9, MovementState::Slamming);
            let json = serde_json::to_string(&event).unwrap();
            let back: MovementEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event, back);
        }
    }

    mod event_log_tests {
        use super::*;

        #[test]
        fn clones_share_storage() {
            let log = EventLog::new();
            let mut writer = log.clone();
            writer.notify(&entered(1, MovementState::Grounding));
            writer.notify(&entered(1, MovementState::Jumping));
            assert_eq!(log.len(), 2);
        }

        #[test]
        fn take_preserves_order_and_drains() {
            let log = EventLog::new();
            let mut writer = log.clone();
            writer.notify(&entered(1, MovementState::Grounding));
            writer.notify(&entered(2, MovementState::Dashing));

            let events = log.take_events();
            assert_eq!(events[0], entered(1, MovementState::Grounding));
            assert_eq!(events[1], entered(2, MovementState::Dashing));
            assert!(log.is_empty());
        }

        #[test]
        fn clear_discards() {
            let log = EventLog::new();
            let mut writer = log.clone();
            writer.notify(&entered(1, MovementState::Grounding));
            log.clear();
            assert_eq!(log.len(), 0);
        }

        #[test]
        fn log_is_send_sync() {
            fn assert_send_sync<T: Send + Sync>() {}
            assert_send_sync::<EventLog>();
        }
    }

    mod observer_tests {
        use super::*;

        #[test]
        fn closures_observe() {
            let mut count = 0;
            {
                let mut observer = |_: &MovementEvent| count += 1;
                observer.notify(&entered(1, MovementState::Grounding));
                observer.notify(&entered(1, MovementState::Jumping));
            }
            assert_eq!(count, 2);
        }

        #[test]
        fn channel_forwards_clones() {
            let (tx, rx) = mpsc::channel();
            let mut observer = ChannelObserver::new(tx);
            observer.notify(&entered(3, MovementState::Dashing));
            assert_eq!(rx.try_recv().unwrap(), entered(3, MovementState::Dashing));
        }

        #[test]
        fn channel_ignores_closed_receiver() {
            let (tx, rx) = mpsc::channel();
            drop(rx);
            let mut observer = ChannelObserver::new(tx);
            observer.notify(&entered(3, MovementState::Dashing));
        }
    }
}
