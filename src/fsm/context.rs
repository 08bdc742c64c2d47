//! Shared mutable context threaded through every FSM handler.
//!
//! `SupervisorContext` is the single struct that state handlers read from
//! and act through: this tick's inputs, the knob decoder, the output stage,
//! and the producer end of the render channel.

use crate::app::commands::BusCommand;
use crate::app::ports::{KnobPort, OutputPort};
use crate::config::Palette;
use crate::knob::KnobDecoder;
use crate::render::channel::UpdateChannel;
use crate::render::RenderRequest;

// ---------------------------------------------------------------------------
// Per-tick inputs (written by the controller before each FSM tick)
// ---------------------------------------------------------------------------

/// Everything the states need to know about the outside world this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInputs {
    /// Monotonic time in milliseconds (wrapping).
    pub now_ms: u32,
    /// Debounced press edge of the override key.
    pub key_pressed: bool,
    /// The decoded bus command received this tick, if any.
    pub command: Option<BusCommand>,
}

// ---------------------------------------------------------------------------
// SupervisorContext
// ---------------------------------------------------------------------------

pub struct SupervisorContext<K: KnobPort, O: OutputPort> {
    // -- Inputs --
    pub inputs: TickInputs,

    // -- Owned collaborators --
    pub knob: KnobDecoder<K>,
    pub output: O,

    // -- Render hand-off --
    pub updates: &'static UpdateChannel,
    pub palette: Palette,
    /// Render requests that displaced an older queued one.
    pub dropped_updates: u32,
}

impl<K: KnobPort, O: OutputPort> SupervisorContext<K, O> {
    pub fn new(
        knob: KnobDecoder<K>,
        output: O,
        updates: &'static UpdateChannel,
        palette: Palette,
    ) -> Self {
        Self {
            inputs: TickInputs::default(),
            knob,
            output,
            updates,
            palette,
            dropped_updates: 0,
        }
    }

    /// Queue a render request; never blocks.
    pub fn push_update(&mut self, request: RenderRequest) {
        if self.updates.push(request) {
            self.dropped_updates = self.dropped_updates.saturating_add(1);
        }
    }

    /// Cut transformer output. Leaves the supply state untouched.
    pub fn output_off(&mut self) {
        self.output.set_power(0);
    }

    /// `true` if this tick carries the given command.
    pub fn received(&self, command: BusCommand) -> bool {
        self.inputs.command == Some(command)
    }
}
