//! Debounced override key.
//!
//! Active-low momentary switch with pull-up. [`KeyDriver::poll`] is called
//! once per control tick; it reports a press exactly once, after the pin
//! has read low for the full debounce window.

use embedded_hal::digital::InputPin;
use log::warn;

/// Minimum stable time before a level change is accepted.
pub const DEBOUNCE_MS: u32 = 20;

pub struct KeyDriver<P: InputPin> {
    pin: P,
    /// Last raw sample and when it was first seen.
    raw_pressed: bool,
    raw_since_ms: u32,
    /// Debounced level.
    pressed: bool,
}

impl<P: InputPin> KeyDriver<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            raw_pressed: false,
            raw_since_ms: 0,
            pressed: false,
        }
    }

    /// Sample the pin. Returns `true` on the tick a debounced press is
    /// recognised. Read errors count as released.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let raw = match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("key: read failed: {:?}", e);
                false
            }
        };

        if raw != self.raw_pressed {
            self.raw_pressed = raw;
            self.raw_since_ms = now_ms;
            return false;
        }

        if raw != self.pressed && now_ms.wrapping_sub(self.raw_since_ms) >= DEBOUNCE_MS {
            self.pressed = raw;
            return raw;
        }

        false
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}
