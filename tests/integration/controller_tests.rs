//! Integration tests for the bus/knob → Controller → output pipeline.
//!
//! Drive the controller tick by tick through mock adapters and assert on
//! what reached the output stage, the knob chip and the event sink.

use crate::mock_hw::{KnobCall, MockIo, MockKnob, MockOutput, RecordingSink};

use trafoctl::app::events::ControllerEvent;
use trafoctl::app::service::Controller;
use trafoctl::config::ControllerConfig;
use trafoctl::error::SafetyFault;
use trafoctl::fsm::StateId;
use trafoctl::knob::Phase;
use trafoctl::render::channel::UpdateChannel;

const ENTER_AUTO: u32 = 0x1000;
const LEAVE_AUTO: u32 = 0x1001;
const SET_POWER: u32 = 0x1002;

struct Rig {
    ctl: Controller<MockKnob, MockOutput>,
    io: MockIo,
    sink: RecordingSink,
    now: u32,
}

impl Rig {
    fn with_config(config: ControllerConfig) -> Self {
        let updates: &'static UpdateChannel = Box::leak(Box::new(UpdateChannel::new()));
        let mut ctl = Controller::new(config, MockKnob::default(), MockOutput::default(), updates)
            .expect("valid config");
        let mut sink = RecordingSink::default();
        ctl.start(&mut sink);
        Self {
            ctl,
            io: MockIo::new(),
            sink,
            now: 1000,
        }
    }

    fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    fn tick(&mut self) {
        self.now += 1;
        self.ctl.tick(self.now, &mut self.io, &mut self.sink);
    }

    fn turn(&mut self, encoder: i32) {
        self.ctl.knob_mut().port_mut().encoder = encoder;
        self.tick();
    }

    fn send(&mut self, id: u32, payload: &[u8]) {
        self.io.send(id, payload);
        self.tick();
    }

    fn press_key(&mut self) {
        self.io.key = true;
        self.tick();
    }

    fn power(&self) -> i32 {
        self.ctl.output().power
    }

    fn enter_auto(&mut self) {
        self.send(ENTER_AUTO, &[]);
        assert_eq!(self.ctl.state(), StateId::Auto);
    }
}

// ── Manual mode: knob drives the output ──────────────────────

#[test]
fn knob_sweep_drives_output() {
    let mut rig = Rig::new();
    assert_eq!(rig.ctl.state(), StateId::Manual);

    rig.turn(40);
    rig.turn(60);
    assert_eq!(rig.ctl.knob().phase(), Phase::ZeroNotch);
    rig.turn(3200);
    assert_eq!(rig.ctl.knob().phase(), Phase::OutsideNotch);
    rig.turn(3200);
    assert_eq!(rig.ctl.knob().phase(), Phase::Max);
    assert_eq!(rig.ctl.knob().position(), 100);
    rig.turn(3050);
    assert_eq!(rig.ctl.knob().phase(), Phase::Max);

    // Entry write, then one write per changed encoder sample.
    assert_eq!(rig.ctl.output().power_writes(), vec![0, 0, 0, 0, 100]);
    assert_eq!(rig.power(), 100);
    assert!(rig.ctl.knob().port().calls.contains(&KnobCall::Hold(20)));
}

#[test]
fn reverse_travel_reaches_min() {
    let mut rig = Rig::new();
    rig.turn(-500);
    rig.turn(-1575);
    assert_eq!(rig.power(), -50);
    rig.turn(-3200);
    rig.turn(-3100);
    assert_eq!(rig.ctl.knob().phase(), Phase::Min);
    assert_eq!(rig.power(), -100);
}

#[test]
fn knob_return_to_notch_rezeroes() {
    let mut rig = Rig::new();
    rig.turn(500);
    rig.turn(1600);
    assert_eq!(rig.power(), 50);

    rig.ctl.knob_mut().port_mut().calls.clear();
    rig.turn(30);
    assert_eq!(rig.ctl.knob().phase(), Phase::ZeroNotch);
    assert_eq!(rig.power(), 0);
    let calls = &rig.ctl.knob().port().calls;
    assert_eq!(
        calls.as_slice(),
        &[KnobCall::Hold(20), KnobCall::Delay(100), KnobCall::Write(0)]
    );
    assert_eq!(rig.ctl.knob().port().encoder, 0);
}

#[test]
fn stop_key_holds_output_off_while_knob_moves() {
    let mut rig = Rig::new();
    rig.turn(500);
    rig.turn(1600);
    assert_eq!(rig.power(), 50);

    // Key press lands on the same tick as a one-count encoder move.
    rig.ctl.knob_mut().port_mut().calls.clear();
    rig.ctl.knob_mut().port_mut().encoder = 1601;
    rig.press_key();
    assert_eq!(rig.ctl.state(), StateId::Manual);
    assert_eq!(rig.power(), 0);
    assert!(rig.ctl.output().supply);
    assert_eq!(rig.ctl.knob().phase(), Phase::ZeroNotch);
    assert_eq!(rig.ctl.knob().position(), 0);
    assert!(rig.ctl.knob().port().calls.contains(&KnobCall::Write(0)));

    // Jitter inside the notch never re-energises the output.
    let writes = rig.ctl.output().power_writes().len();
    for e in [1, -1, 2, 0] {
        rig.turn(e);
        assert_eq!(rig.power(), 0);
    }
    assert!(rig.ctl.output().power_writes()[writes..].iter().all(|&p| p == 0));

    // Leaving the notch only arms the knob; the next move sets power.
    rig.turn(1602);
    assert_eq!(rig.ctl.knob().phase(), Phase::OutsideNotch);
    assert_eq!(rig.power(), 0);
    rig.turn(1700);
    assert_eq!(rig.power(), 54);
}

// ── Auto mode: bus drives the output ─────────────────────────

#[test]
fn bus_takes_over_and_hands_back() {
    let mut rig = Rig::new();
    rig.turn(500);
    rig.turn(1600);

    rig.enter_auto();
    assert_eq!(rig.power(), 0);
    assert_eq!(rig.ctl.knob().phase(), Phase::ZeroNotch);
    assert!(rig.sink.events.contains(&ControllerEvent::StateChanged {
        from: StateId::Manual,
        to: StateId::Auto,
    }));

    rig.send(SET_POWER, &[60, 0]);
    assert_eq!(rig.power(), -60);
    rig.send(SET_POWER, &[25, 1]);
    assert_eq!(rig.power(), 25);

    // Knob is ignored in Auto.
    rig.turn(2500);
    rig.turn(2600);
    assert_eq!(rig.power(), 25);

    rig.send(LEAVE_AUTO, &[]);
    assert_eq!(rig.ctl.state(), StateId::Manual);
    assert_eq!(rig.power(), 0);
}

#[test]
fn set_power_in_manual_is_ignored() {
    let mut rig = Rig::new();
    rig.send(SET_POWER, &[80, 1]);
    assert_eq!(rig.ctl.state(), StateId::Manual);
    assert_eq!(rig.power(), 0);
}

#[test]
fn malformed_and_unknown_frames_are_ignored() {
    let mut rig = Rig::new();
    rig.enter_auto();
    let events = rig.sink.events.len();

    rig.send(SET_POWER, &[50]);
    rig.send(SET_POWER, &[]);
    rig.send(0x7ff, &[1, 2, 3]);
    assert_eq!(rig.ctl.state(), StateId::Auto);
    assert_eq!(rig.power(), 0);
    assert_eq!(rig.sink.events.len(), events);
}

#[test]
fn one_frame_per_tick() {
    let mut rig = Rig::new();
    rig.io.send(ENTER_AUTO, &[]);
    rig.io.send(SET_POWER, &[40, 1]);
    rig.tick();
    assert_eq!(rig.ctl.state(), StateId::Auto);
    assert_eq!(rig.power(), 0);
    rig.tick();
    assert_eq!(rig.power(), 40);
}

#[test]
fn key_leaves_auto() {
    let mut rig = Rig::new();
    rig.enter_auto();
    rig.send(SET_POWER, &[90, 1]);
    rig.press_key();
    assert_eq!(rig.ctl.state(), StateId::Manual);
    assert_eq!(rig.power(), 0);
}

#[test]
fn custom_bus_ids() {
    let mut config = ControllerConfig::default();
    config.bus.enter_auto_id = 0x10;
    config.bus.leave_auto_id = 0x11;
    config.bus.set_power_id = 0x12;
    let mut rig = Rig::with_config(config);

    rig.send(ENTER_AUTO, &[]);
    assert_eq!(rig.ctl.state(), StateId::Manual);
    rig.send(0x10, &[]);
    assert_eq!(rig.ctl.state(), StateId::Auto);
    rig.send(0x12, &[7, 0]);
    assert_eq!(rig.power(), -7);
}

// ── Fault supervision ────────────────────────────────────────

#[test]
fn short_circuit_latches_fault() {
    let mut rig = Rig::new();
    rig.enter_auto();
    rig.send(SET_POWER, &[80, 1]);

    rig.io.supply_mv = 500;
    let mut ticks = 0;
    while rig.ctl.state() != StateId::Fault && ticks < 100 {
        rig.tick();
        ticks += 1;
    }
    // First low sample starts the timer; the fault confirms 50 ms later.
    assert_eq!(ticks, 51);
    assert!(!rig.ctl.output().supply);
    assert_eq!(rig.power(), 0);
    assert!(rig.sink.events.contains(&ControllerEvent::FaultDetected(
        SafetyFault::SupplyUndervoltage { supply_mv: 500 }
    )));
    assert_eq!(
        rig.sink.events.last(),
        Some(&ControllerEvent::StateChanged {
            from: StateId::Auto,
            to: StateId::Fault,
        })
    );

    // Latched: recovery and bus traffic do not clear it.
    rig.io.supply_mv = 12_000;
    rig.send(ENTER_AUTO, &[]);
    rig.send(LEAVE_AUTO, &[]);
    assert_eq!(rig.ctl.state(), StateId::Fault);

    rig.press_key();
    assert_eq!(rig.ctl.state(), StateId::Manual);
    assert!(rig.ctl.output().supply);
    assert_eq!(rig.power(), 0);
}

#[test]
fn brief_dips_never_latch() {
    let mut rig = Rig::new();
    for _ in 0..5 {
        rig.io.supply_mv = 1500;
        for _ in 0..40 {
            rig.tick();
        }
        rig.io.supply_mv = 2000;
        rig.tick();
    }
    assert_eq!(rig.ctl.state(), StateId::Manual);
    assert!(!rig.sink.events.iter().any(|e| matches!(e, ControllerEvent::FaultDetected(_))));
}

#[test]
fn low_rail_with_supply_off_is_not_timed() {
    let mut rig = Rig::new();
    rig.io.supply_mv = 0;
    for _ in 0..60 {
        rig.tick();
    }
    assert_eq!(rig.ctl.state(), StateId::Fault);

    // Rail stays dead while the supply is off: nothing accumulates.
    for _ in 0..200 {
        rig.tick();
    }
    rig.press_key();
    assert_eq!(rig.ctl.state(), StateId::Manual);

    // A still-shorted output needs a fresh dwell window to re-latch.
    for _ in 0..10 {
        rig.tick();
    }
    assert_eq!(rig.ctl.state(), StateId::Manual);
    for _ in 0..40 {
        rig.tick();
    }
    assert_eq!(rig.ctl.state(), StateId::Fault);
}

#[test]
fn telemetry_snapshot() {
    let mut rig = Rig::new();
    rig.enter_auto();
    rig.send(SET_POWER, &[33, 1]);
    rig.ctl.report(&mut rig.sink);
    match rig.sink.events.last() {
        Some(ControllerEvent::Telemetry(status)) => {
            assert_eq!(status.state, StateId::Auto);
            assert_eq!(status.output_power, 33);
            assert!(status.supply_enabled);
        }
        other => panic!("expected telemetry, got {other:?}"),
    }
    assert_eq!(rig.ctl.tick_count(), 2);
}
