//! Knob decoder.
//!
//! Turns the unbounded encoder count of the knob's motor-driver chip into a
//! bounded power level in `[-100, 100]`. A phase machine with hysteresis on
//! every zone boundary keeps encoder jitter from chattering between zones.
//!
//! ```text
//!            |e| > notch+hyst               e > max
//!  ZERO_NOTCH ───────────────▶ OUTSIDE ───────────────▶ MAX
//!       ▲                      │  ▲  ▲                    │
//!       └──────── |e| ≤ notch ─┘  │  └── e < max-hyst ────┘
//!                                 │
//!                       MIN ──────┘  (mirror of MAX)
//! ```
//!
//! Entering ZeroNotch, Max or Min fires a short hold-current pulse on the
//! knob motor so the operator feels the boundary. The pulse releases itself
//! after `pulse_ms`, independent of later phase changes.
//!
//! Not re-entrant: call [`KnobDecoder::run`] once per control tick from a
//! single context.

use log::debug;

use crate::app::ports::KnobPort;
use crate::config::KnobConfig;

/// Output at full saturation.
pub const FULL_SCALE: i32 = 100;

/// Decoder phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not yet initialised. The next `run` re-zeroes.
    Undefined,
    ZeroNotch,
    OutsideNotch,
    Max,
    Min,
}

pub struct KnobDecoder<K: KnobPort> {
    port: K,
    config: KnobConfig,
    encoder: i32,
    last_encoder: i32,
    position: i32,
    phase: Phase,
    last_phase: Phase,
    changed: bool,
    pulse_active: bool,
    pulse_started_ms: u32,
    pulse_hold_after: u8,
}

impl<K: KnobPort> KnobDecoder<K> {
    /// Wrap the chip. The decoder starts `Undefined`; the first [`run`](Self::run)
    /// or an explicit [`init`](Self::init) re-zeroes it.
    pub fn new(port: K, config: KnobConfig) -> Self {
        Self {
            port,
            config,
            encoder: 0,
            last_encoder: 0,
            position: 0,
            phase: Phase::Undefined,
            last_phase: Phase::Undefined,
            changed: false,
            pulse_active: false,
            pulse_started_ms: 0,
            pulse_hold_after: 0,
        }
    }

    /// Re-zero the knob at its current mechanical position.
    ///
    /// Holds the shaft at `zero_hold_current`, blocks for `settle_us`, then
    /// rebases the hardware counter to zero. Any accumulated offset is lost.
    pub fn init(&mut self) {
        self.port.set_hold_current(self.config.zero_hold_current);
        self.port.delay_us(self.config.settle_us);
        self.port.write_encoder(0);
        self.encoder = self.port.read_encoder();
        self.last_encoder = self.encoder;
        self.phase = Phase::ZeroNotch;
        self.last_phase = Phase::ZeroNotch;
        self.position = 0;
        debug!("knob: re-zeroed (encoder={})", self.encoder);
    }

    /// Sample the encoder and advance the phase machine by one step.
    pub fn run(&mut self, now_ms: u32) {
        self.encoder = self.port.read_encoder();
        if self.encoder != self.last_encoder {
            self.last_encoder = self.encoder;
            self.changed = true;
        }

        let e = self.encoder;
        let max = self.config.max_encoder;
        let notch = self.config.null_offset;
        let hyst = self.config.hysteresis;

        match self.phase {
            Phase::Undefined => self.init(),

            Phase::ZeroNotch => {
                if !(-(notch + hyst)..=notch + hyst).contains(&e) {
                    self.port.set_hold_current(0);
                    self.phase = Phase::OutsideNotch;
                }
            }

            Phase::OutsideNotch => {
                if (-notch..=notch).contains(&e) {
                    self.position = 0;
                    if self.last_phase != Phase::ZeroNotch {
                        self.pulse(now_ms);
                        self.port.delay_us(self.config.rebase_delay_us);
                        self.port.write_encoder(0);
                    }
                    self.phase = Phase::ZeroNotch;
                } else if e > max {
                    self.position = FULL_SCALE;
                    if self.last_phase != Phase::Max {
                        self.pulse(now_ms);
                    }
                    self.phase = Phase::Max;
                } else if e < -max {
                    self.position = -FULL_SCALE;
                    if self.last_phase != Phase::Min {
                        self.pulse(now_ms);
                    }
                    self.phase = Phase::Min;
                } else {
                    self.position = self.scale(e);
                }
            }

            Phase::Max => {
                if e < max - hyst {
                    self.port.set_hold_current(0);
                    self.phase = Phase::OutsideNotch;
                } else if e > max + hyst {
                    self.pulse(now_ms);
                    self.port.write_encoder(max + hyst);
                }
            }

            Phase::Min => {
                if e > -(max - hyst) {
                    self.port.set_hold_current(0);
                    self.phase = Phase::OutsideNotch;
                } else if e < -(max + hyst) {
                    self.pulse(now_ms);
                    self.port.write_encoder(-(max + hyst));
                }
            }
        }

        if self.phase != self.last_phase {
            debug!("knob: {:?} -> {:?} (encoder={})", self.last_phase, self.phase, e);
        }
        self.last_phase = self.phase;

        if self.pulse_active && now_ms.wrapping_sub(self.pulse_started_ms) >= self.config.pulse_ms {
            self.port.set_hold_current(self.pulse_hold_after);
            self.pulse_active = false;
        }
    }

    /// Read-and-clear the change latch. Returns `true` at most once per
    /// distinct encoder sample.
    pub fn has_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    /// Normalised power level in `[-100, 100]`.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Last sampled raw encoder count.
    pub fn encoder(&self) -> i32 {
        self.encoder
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a tactile pulse is currently being held.
    pub fn pulse_active(&self) -> bool {
        self.pulse_active
    }

    /// Borrow the underlying chip (for adapters and tests).
    pub fn port(&self) -> &K {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut K {
        &mut self.port
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Linear map of the travel between notch edge and saturation onto
    /// `1..=100` (truncating toward zero, so values just outside the notch
    /// still read 0).
    fn scale(&self, e: i32) -> i32 {
        let max = self.config.max_encoder;
        let notch = self.config.null_offset;
        let span = max - notch;
        if (notch..=max).contains(&e) {
            (e - notch) * FULL_SCALE / span
        } else if (-max..=-notch).contains(&e) {
            (e + notch) * FULL_SCALE / span
        } else {
            self.position
        }
    }

    fn pulse(&mut self, now_ms: u32) {
        self.pulse_hold_after = self.config.pulse_hold_after;
        self.port.set_hold_current(self.config.pulse_current);
        self.pulse_started_ms = now_ms;
        self.pulse_active = true;
    }
}
