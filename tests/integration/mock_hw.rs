//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full command history
//! without touching real pins.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use trafoctl::app::commands::BusFrame;
use trafoctl::app::events::ControllerEvent;
use trafoctl::app::ports::{CommandPort, Display, EventSink, KnobPort, OutputPort, SensorPort};
use trafoctl::render::screen::Screen;

// ── Knob chip ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnobCall {
    Write(i32),
    Hold(u8),
    Delay(u32),
}

#[derive(Debug, Default)]
pub struct MockKnob {
    pub encoder: i32,
    pub calls: Vec<KnobCall>,
}

impl KnobPort for MockKnob {
    fn read_encoder(&mut self) -> i32 {
        self.encoder
    }

    fn write_encoder(&mut self, value: i32) {
        self.encoder = value;
        self.calls.push(KnobCall::Write(value));
    }

    fn set_hold_current(&mut self, level: u8) {
        self.calls.push(KnobCall::Hold(level.min(31)));
    }

    fn delay_us(&mut self, us: u32) {
        self.calls.push(KnobCall::Delay(us));
    }
}

// ── Output stage ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCall {
    Supply(bool),
    Power(i32),
}

#[derive(Debug, Default)]
pub struct MockOutput {
    pub supply: bool,
    pub power: i32,
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockOutput {
    /// Power writes only, in order.
    pub fn power_writes(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                OutputCall::Power(p) => Some(*p),
                OutputCall::Supply(_) => None,
            })
            .collect()
    }
}

impl OutputPort for MockOutput {
    fn set_supply(&mut self, enabled: bool) {
        self.supply = enabled;
        self.calls.push(OutputCall::Supply(enabled));
    }

    fn supply_enabled(&self) -> bool {
        self.supply
    }

    fn set_power(&mut self, power: i32) {
        self.power = power.clamp(-100, 100);
        self.calls.push(OutputCall::Power(self.power));
    }

    fn power(&self) -> i32 {
        self.power
    }
}

// ── Sensors and bus ───────────────────────────────────────────

pub struct MockIo {
    pub supply_mv: u32,
    /// One-shot: consumed by the next `key_pressed`.
    pub key: bool,
    pub rx: VecDeque<BusFrame>,
}

#[allow(dead_code)]
impl MockIo {
    pub fn new() -> Self {
        Self {
            supply_mv: 12_000,
            key: false,
            rx: VecDeque::new(),
        }
    }

    pub fn send(&mut self, id: u32, payload: &[u8]) {
        self.rx.push_back(BusFrame::new(id, payload));
    }
}

impl SensorPort for MockIo {
    fn read_supply_mv(&mut self) -> u32 {
        self.supply_mv
    }

    fn key_pressed(&mut self, _now_ms: u32) -> bool {
        std::mem::take(&mut self.key)
    }
}

impl CommandPort for MockIo {
    fn poll(&mut self) -> Option<BusFrame> {
        self.rx.pop_front()
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ControllerEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControllerEvent) {
        self.events.push(event.clone());
    }
}

// ── Display ───────────────────────────────────────────────────

/// Shares its frame log so a test can inspect it while the display is
/// owned by a render thread.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub frames: Arc<Mutex<Vec<Screen>>>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn last(&self) -> Option<Screen> {
        self.frames.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl Display for RecordingDisplay {
    fn show(&mut self, screen: &Screen) {
        self.frames.lock().unwrap().push(screen.clone());
    }
}
