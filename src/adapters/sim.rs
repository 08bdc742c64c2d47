//! Simulated board for host builds.
//!
//! Stands in for the knob chip, the output stage pins, the key, the supply
//! rail and the bus receiver, so the full controller can run on a desktop.
//! A [`Scenario`] replays a timed script of operator and bus actions.
//!
//! | Item           | Implements                      |
//! |----------------|---------------------------------|
//! | `SimKnobChip`  | `KnobPort`                      |
//! | `SimPin`       | `OutputPin`, `InputPin`         |
//! | `SimPwm`       | `SetDutyCycle`                  |
//! | `SimBoard`     | `SensorPort` + `CommandPort`    |
//! | `LogDisplay`   | `Display`                       |

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use heapless::Deque;
use log::{debug, info, warn};

use crate::app::commands::BusFrame;
use crate::app::ports::{CommandPort, Display, KnobPort, SensorPort};
use crate::drivers::key::KeyDriver;
use crate::render::screen::{Arrow, Screen};

/// The chip's hold current register is five bits wide.
pub const MAX_HOLD_CURRENT: u8 = 31;

/// Depth of the simulated receive FIFO.
pub const RX_DEPTH: usize = 8;

/// Nominal DC/DC rail voltage.
pub const NOMINAL_SUPPLY_MV: u32 = 12_000;

// ───────────────────────────────────────────────────────────────
// Knob chip
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SimKnobChip {
    encoder: i32,
    hold_current: u8,
}

impl SimKnobChip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the shaft to an absolute encoder count.
    pub fn turn_to(&mut self, encoder: i32) {
        self.encoder = encoder;
    }

    pub fn hold_current(&self) -> u8 {
        self.hold_current
    }
}

impl KnobPort for SimKnobChip {
    fn read_encoder(&mut self) -> i32 {
        self.encoder
    }

    fn write_encoder(&mut self, value: i32) {
        self.encoder = value;
    }

    fn set_hold_current(&mut self, level: u8) {
        self.hold_current = level.min(MAX_HOLD_CURRENT);
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }
}

// ───────────────────────────────────────────────────────────────
// Pins and PWM
// ───────────────────────────────────────────────────────────────

/// A GPIO that remembers its level. Usable as input or output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimPin {
    high: bool,
}

impl SimPin {
    pub fn new(high: bool) -> Self {
        Self { high }
    }

    pub fn set_level(&mut self, high: bool) {
        self.high = high;
    }

    pub fn level(&self) -> bool {
        self.high
    }
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

/// 8-bit PWM channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimPwm {
    duty: u16,
}

impl SimPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl PwmErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty = duty;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Board: key, supply rail, bus receiver
// ───────────────────────────────────────────────────────────────

pub struct SimBoard {
    key: KeyDriver<SimPin>,
    supply_mv: u32,
    rx: Deque<BusFrame, RX_DEPTH>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            // Pull-up: released reads high.
            key: KeyDriver::new(SimPin::new(true)),
            supply_mv: NOMINAL_SUPPLY_MV,
            rx: Deque::new(),
        }
    }

    /// Hold (`true`) or release the key.
    pub fn set_key(&mut self, held: bool) {
        self.key.pin_mut().set_level(!held);
    }

    pub fn set_supply_mv(&mut self, mv: u32) {
        self.supply_mv = mv;
    }

    /// Queue an inbound frame. Returns `false` if the FIFO overflowed.
    pub fn receive(&mut self, frame: BusFrame) -> bool {
        match self.rx.push_back(frame) {
            Ok(()) => true,
            Err(lost) => {
                warn!("sim: rx overflow, frame 0x{:x} lost", lost.id);
                false
            }
        }
    }
}

impl SensorPort for SimBoard {
    fn read_supply_mv(&mut self) -> u32 {
        self.supply_mv
    }

    fn key_pressed(&mut self, now_ms: u32) -> bool {
        self.key.poll(now_ms)
    }
}

impl CommandPort for SimBoard {
    fn poll(&mut self) -> Option<BusFrame> {
        self.rx.pop_front()
    }
}

// ───────────────────────────────────────────────────────────────
// Display
// ───────────────────────────────────────────────────────────────

/// Logs each frame instead of drawing it.
#[derive(Debug, Default)]
pub struct LogDisplay {
    frames: u64,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for LogDisplay {
    fn show(&mut self, screen: &Screen) {
        self.frames += 1;
        let (left, right) = match screen.arrow {
            Some(Arrow::Left) => (Arrow::Left.glyph(), " "),
            Some(Arrow::Right) => (" ", Arrow::Right.glyph()),
            None => (" ", " "),
        };
        info!(
            "DISPLAY #{} | bg={:?} fg={:?} | {} {:>4} {} | x{} | {}",
            self.frames,
            screen.background,
            screen.foreground,
            left,
            screen.headline.as_str(),
            right,
            screen.headline_scale,
            screen.footer,
        );
    }
}

// ───────────────────────────────────────────────────────────────
// Scenario
// ───────────────────────────────────────────────────────────────

/// One scripted stimulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimAction {
    Turn(i32),
    KeyDown,
    KeyUp,
    Supply(u32),
    Frame(BusFrame),
}

/// A time-ordered script replayed against the simulated board.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    steps: Vec<(u32, SimAction)>,
    next: usize,
}

impl Scenario {
    pub fn new(mut steps: Vec<(u32, SimAction)>) -> Self {
        steps.sort_by_key(|(at, _)| *at);
        Self { steps, next: 0 }
    }

    /// A tour of every mode: knob sweep, bus control, a short, and the
    /// key acknowledging it.
    pub fn demo() -> Self {
        use SimAction::{Frame, KeyDown, KeyUp, Supply, Turn};
        Self::new(vec![
            (200, Turn(400)),
            (300, Turn(1600)),
            (400, Turn(3200)),
            (800, Turn(3000)),
            (900, Turn(20)),
            (1300, KeyDown),
            (1350, KeyUp),
            (1500, Frame(BusFrame::new(0x1000, &[]))),
            (1600, Frame(BusFrame::new(0x1002, &[60, 0]))),
            (1700, Frame(BusFrame::new(0x1002, &[35, 1]))),
            (1800, Supply(900)),
            (1900, Supply(NOMINAL_SUPPLY_MV)),
            (2200, KeyDown),
            (2250, KeyUp),
            (2400, Frame(BusFrame::new(0x1000, &[]))),
            (2500, Frame(BusFrame::new(0x1002, &[100, 1]))),
            (2600, Frame(BusFrame::new(0x1001, &[]))),
        ])
    }

    /// Apply every step due at or before `now_ms`.
    pub fn apply(&mut self, now_ms: u32, knob: &mut SimKnobChip, board: &mut SimBoard) {
        while let Some((at, action)) = self.steps.get(self.next) {
            if *at > now_ms {
                break;
            }
            debug!("sim: t={} {:?}", at, action);
            match action {
                SimAction::Turn(e) => knob.turn_to(*e),
                SimAction::KeyDown => board.set_key(true),
                SimAction::KeyUp => board.set_key(false),
                SimAction::Supply(mv) => board.set_supply_mv(*mv),
                SimAction::Frame(frame) => {
                    board.receive(frame.clone());
                }
            }
            self.next += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }

    /// Time of the last step.
    pub fn end_ms(&self) -> u32 {
        self.steps.last().map_or(0, |(at, _)| *at)
    }
}
