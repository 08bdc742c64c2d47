//! Controller service: the hexagonal core.
//!
//! [`Controller`] owns the FSM, the fault monitor and the shared context.
//! All I/O flows through port traits injected at construction or at call
//! sites, so the whole controller runs against mock adapters in tests.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//! CommandPort ──▶ │       Controller       │ ──▶ UpdateChannel
//!    KnobPort ◀──▶│  FSM · Knob · Fault    │
//!  OutputPort ◀── └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{BusConfig, ControllerConfig};
use crate::error;
use crate::fsm::context::{SupervisorContext, TickInputs};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::knob::KnobDecoder;
use crate::render::channel::UpdateChannel;
use crate::safety::FaultMonitor;

use super::commands::{BusCommand, BusFrame};
use super::events::{ControllerEvent, ControllerStatus};
use super::ports::{CommandPort, EventSink, KnobPort, OutputPort, SensorPort};

/// Raw samples for one control tick, before bus decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputs {
    pub now_ms: u32,
    pub key_pressed: bool,
    pub frame: Option<BusFrame>,
    pub supply_mv: u32,
}

pub struct Controller<K: KnobPort, O: OutputPort> {
    fsm: Fsm<K, O>,
    ctx: SupervisorContext<K, O>,
    fault: FaultMonitor,
    bus: BusConfig,
}

impl<K: KnobPort, O: OutputPort> Controller<K, O> {
    /// Build the controller. Fails if `config` does not validate.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(
        config: ControllerConfig,
        knob: K,
        output: O,
        updates: &'static UpdateChannel,
    ) -> error::Result<Self> {
        config.validate()?;
        let knob = KnobDecoder::new(knob, config.knob);
        let ctx = SupervisorContext::new(knob, output, updates, config.palette);
        Ok(Self {
            fsm: Fsm::new(build_state_table(), StateId::Manual),
            ctx,
            fault: FaultMonitor::new(&config.fault),
            bus: config.bus,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state (Manual).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&ControllerEvent::Started(self.fsm.current_state()));
        info!("Controller started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: poll bus → read key and supply → FSM → fault monitor.
    ///
    /// `io` satisfies both [`SensorPort`] and [`CommandPort`], keeping the
    /// port boundary explicit without a double mutable borrow.
    pub fn tick(
        &mut self,
        now_ms: u32,
        io: &mut (impl SensorPort + CommandPort),
        sink: &mut impl EventSink,
    ) {
        let frame = io.poll();
        let key_pressed = io.key_pressed(now_ms);
        let supply_mv = io.read_supply_mv();
        self.step(
            RawInputs {
                now_ms,
                key_pressed,
                frame,
                supply_mv,
            },
            sink,
        );
    }

    /// Same as [`tick`](Self::tick) with the samples already taken.
    pub fn step(&mut self, raw: RawInputs, sink: &mut impl EventSink) {
        let prev_state = self.fsm.current_state();

        let command = raw
            .frame
            .as_ref()
            .and_then(|frame| BusCommand::decode(frame, &self.bus));
        self.ctx.inputs = TickInputs {
            now_ms: raw.now_ms,
            key_pressed: raw.key_pressed,
            command,
        };

        self.fsm.tick(&mut self.ctx);

        let supply_enabled = self.ctx.output.supply_enabled();
        if let Some(fault) = self.fault.evaluate(raw.supply_mv, supply_enabled, raw.now_ms) {
            if self.fsm.current_state() != StateId::Fault {
                warn!("Safety fault: {}", fault);
                self.fsm.force_transition(StateId::Fault, &mut self.ctx);
                sink.emit(&ControllerEvent::FaultDetected(fault));
            }
        }

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&ControllerEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            state: self.fsm.current_state(),
            ticks_in_state: self.fsm.ticks_in_current_state(),
            phase: self.ctx.knob.phase(),
            position: self.ctx.knob.position(),
            encoder: self.ctx.knob.encoder(),
            output_power: self.ctx.output.power(),
            supply_enabled: self.ctx.output.supply_enabled(),
            dropped_updates: self.ctx.dropped_updates,
        }
    }

    /// Emit a [`ControllerEvent::Telemetry`] snapshot.
    pub fn report(&self, sink: &mut impl EventSink) {
        sink.emit(&ControllerEvent::Telemetry(self.status()));
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.fsm.total_ticks()
    }

    pub fn output(&self) -> &O {
        &self.ctx.output
    }

    pub fn knob(&self) -> &KnobDecoder<K> {
        &self.ctx.knob
    }

    /// Mutable knob access, for simulators that move the shaft.
    pub fn knob_mut(&mut self) -> &mut KnobDecoder<K> {
        &mut self.ctx.knob
    }
}
