//! In-memory port doubles shared by the unit tests of `fsm` and `app`.

use crate::app::ports::{KnobPort, OutputPort};
use crate::config::{KnobConfig, Palette};
use crate::knob::KnobDecoder;
use crate::render::channel::UpdateChannel;

use super::context::SupervisorContext;

#[derive(Debug, Default)]
pub struct FakeChip {
    pub encoder: i32,
    pub hold: Vec<u8>,
}

impl KnobPort for FakeChip {
    fn read_encoder(&mut self) -> i32 {
        self.encoder
    }
    fn write_encoder(&mut self, value: i32) {
        self.encoder = value;
    }
    fn set_hold_current(&mut self, level: u8) {
        self.hold.push(level);
    }
    fn delay_us(&mut self, _us: u32) {}
}

#[derive(Debug, Default)]
pub struct FakeStage {
    pub supply: bool,
    pub power: i32,
    pub writes: Vec<i32>,
}

impl OutputPort for FakeStage {
    fn set_supply(&mut self, enabled: bool) {
        self.supply = enabled;
    }
    fn supply_enabled(&self) -> bool {
        self.supply
    }
    fn set_power(&mut self, power: i32) {
        self.power = power.clamp(-100, 100);
        self.writes.push(self.power);
    }
    fn power(&self) -> i32 {
        self.power
    }
}

pub fn leak_channel() -> &'static UpdateChannel {
    Box::leak(Box::new(UpdateChannel::new()))
}

pub fn make_ctx() -> SupervisorContext<FakeChip, FakeStage> {
    SupervisorContext::new(
        KnobDecoder::new(FakeChip::default(), KnobConfig::default()),
        FakeStage::default(),
        leak_channel(),
        Palette::default(),
    )
}

/// Drain the render channel, keeping only the newest request.
pub fn latest_update(ctx: &SupervisorContext<FakeChip, FakeStage>) -> Option<crate::render::RenderRequest> {
    let mut last = None;
    while let Some(r) = ctx.updates.try_pop() {
        last = Some(r);
    }
    last
}
