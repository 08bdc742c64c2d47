//! Outbound controller events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use crate::error::SafetyFault;
use crate::fsm::StateId;
use crate::knob::Phase;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The controller has started (carries the initial state).
    Started(StateId),

    /// The supervisor moved between modes.
    StateChanged { from: StateId, to: StateId },

    /// The fault monitor confirmed a supply fault.
    FaultDetected(SafetyFault),

    /// Periodic status snapshot.
    Telemetry(ControllerStatus),
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerStatus {
    pub state: StateId,
    /// Control ticks spent in `state` since it was last entered.
    pub ticks_in_state: u64,
    pub phase: Phase,
    /// Knob position in `[-100, 100]`.
    pub position: i32,
    pub encoder: i32,
    /// Power currently applied to the transformer.
    pub output_power: i32,
    pub supply_enabled: bool,
    /// Render requests that replaced an unread one since startup.
    pub dropped_updates: u32,
}
