//! Fuzz target: `Controller::step`
//!
//! Each 4-byte record is one tick: encoder delta, supply level, key, and a
//! bus selector. Checks that the output never leaves full scale and that
//! the supply is off whenever the controller sits in Fault.
//!
//! cargo fuzz run fuzz_controller_step

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafoctl::app::commands::BusFrame;
use trafoctl::app::events::ControllerEvent;
use trafoctl::app::ports::{EventSink, KnobPort, OutputPort};
use trafoctl::app::service::{Controller, RawInputs};
use trafoctl::config::ControllerConfig;
use trafoctl::fsm::StateId;
use trafoctl::render::channel::UpdateChannel;

static UPDATES: UpdateChannel = UpdateChannel::new();

#[derive(Default)]
struct Chip(i32);

impl KnobPort for Chip {
    fn read_encoder(&mut self) -> i32 {
        self.0
    }
    fn write_encoder(&mut self, value: i32) {
        self.0 = value;
    }
    fn set_hold_current(&mut self, _level: u8) {}
    fn delay_us(&mut self, _us: u32) {}
}

#[derive(Default)]
struct Stage {
    supply: bool,
    power: i32,
}

impl OutputPort for Stage {
    fn set_supply(&mut self, enabled: bool) {
        self.supply = enabled;
    }
    fn supply_enabled(&self) -> bool {
        self.supply
    }
    fn set_power(&mut self, power: i32) {
        self.power = power.clamp(-100, 100);
    }
    fn power(&self) -> i32 {
        self.power
    }
}

struct Null;

impl EventSink for Null {
    fn emit(&mut self, _event: &ControllerEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut ctl) = Controller::new(
        ControllerConfig::default(),
        Chip::default(),
        Stage::default(),
        &UPDATES,
    ) else {
        return;
    };
    ctl.start(&mut Null);

    for (t, rec) in data.chunks_exact(4).enumerate() {
        let delta = i32::from(rec[0] as i8) * 40;
        let encoder = ctl.knob().port().0.saturating_add(delta);
        ctl.knob_mut().port_mut().0 = encoder;

        let frame = match rec[3] % 5 {
            0 => Some(BusFrame::new(0x1000, &[])),
            1 => Some(BusFrame::new(0x1001, &[])),
            2 => Some(BusFrame::new(0x1002, &[rec[1], rec[2]])),
            _ => None,
        };
        ctl.step(
            RawInputs {
                now_ms: t as u32,
                key_pressed: rec[2] == 0xff,
                frame,
                supply_mv: u32::from(rec[1]) * 100,
            },
            &mut Null,
        );

        assert!((-100..=100).contains(&ctl.output().power));
        assert!((-100..=100).contains(&ctl.knob().position()));
        if ctl.state() == StateId::Fault {
            assert!(!ctl.output().supply);
        }
    }
    while UPDATES.try_pop().is_some() {}
});
