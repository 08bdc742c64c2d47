//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured controller events to the
//! `log` facade. Whatever logger the binary installs decides where they end up.

use log::{info, warn};

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} ({} ticks) | knob={:?} pos={} enc={} | out={} supply={} | dropped={}",
                    t.state,
                    t.ticks_in_state,
                    t.phase,
                    t.position,
                    t.encoder,
                    t.output_power,
                    if t.supply_enabled { "ON" } else { "OFF" },
                    t.dropped_updates,
                );
            }
            ControllerEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            ControllerEvent::FaultDetected(fault) => {
                warn!("FAULT | {}", fault);
            }
            ControllerEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
