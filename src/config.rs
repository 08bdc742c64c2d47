//! Controller configuration parameters
//!
//! All tunable parameters for the transformer controller. The defaults are
//! the values the hardware was commissioned with; a host build can override
//! them from a JSON file (see [`crate::adapters::config_file`]).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Knob decoder tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnobConfig {
    /// Encoder count at which the output saturates at ±100.
    pub max_encoder: i32,
    /// Half-width of the zero-notch band.
    pub null_offset: i32,
    /// Dead band added on the leaving side of each zone boundary.
    pub hysteresis: i32,
    /// Hold current applied while the encoder settles during re-zero.
    pub zero_hold_current: u8,
    /// Settle time after applying the zero hold current (microseconds).
    pub settle_us: u32,
    /// Hold current of the tactile pulse fired on zone entry.
    pub pulse_current: u8,
    /// Hold current the pulse releases to.
    pub pulse_hold_after: u8,
    /// Duration of the tactile pulse (milliseconds).
    pub pulse_ms: u32,
    /// Delay between the zero-notch pulse and the counter rebase (microseconds).
    pub rebase_delay_us: u32,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            max_encoder: 3100,
            null_offset: 50,
            hysteresis: 50,
            zero_hold_current: 10,
            settle_us: 100_000, // 100 ms
            pulse_current: 20,
            pulse_hold_after: 2,
            pulse_ms: 300,
            rebase_delay_us: 100,
        }
    }
}

/// Supply rail fault detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultConfig {
    /// Rail voltage below which a sample counts as faulting (millivolts).
    pub threshold_mv: u32,
    /// How long the rail must stay low before the fault is confirmed (ms).
    pub dwell_ms: u32,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            threshold_mv: 2000,
            dwell_ms: 50,
        }
    }
}

/// Bus command identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    pub enter_auto_id: u32,
    pub leave_auto_id: u32,
    pub set_power_id: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            enter_auto_id: 0x1000,
            leave_auto_id: 0x1001,
            set_power_id: 0x1002,
        }
    }
}

/// Display colour scheme per operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub manual_bg: Rgb,
    pub manual_fg: Rgb,
    pub auto_bg: Rgb,
    pub auto_fg: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            manual_bg: (153, 255, 51), // lime
            manual_fg: (0, 0, 0),
            auto_bg: (0, 0, 255),
            auto_fg: (255, 255, 255),
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub knob: KnobConfig,
    pub fault: FaultConfig,
    pub bus: BusConfig,
    pub palette: Palette,
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (milliseconds, 0 = off)
    pub telemetry_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            knob: KnobConfig::default(),
            fault: FaultConfig::default(),
            bus: BusConfig::default(),
            palette: Palette::default(),
            control_loop_interval_ms: 1,
            telemetry_interval_ms: 5000,
        }
    }
}

impl ControllerConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.knob;
        if k.null_offset <= 0 {
            return Err(ConfigError::ValidationFailed("knob.null_offset must be positive"));
        }
        if k.hysteresis < 0 {
            return Err(ConfigError::ValidationFailed("knob.hysteresis must not be negative"));
        }
        // The notch exit threshold and the saturation re-entry threshold
        // must not overlap, or the phase machine would chatter.
        if k.null_offset + k.hysteresis >= k.max_encoder - k.hysteresis {
            return Err(ConfigError::ValidationFailed(
                "knob.max_encoder too small for null_offset + hysteresis",
            ));
        }
        if k.max_encoder > i32::MAX / 200 {
            return Err(ConfigError::ValidationFailed("knob.max_encoder out of range"));
        }
        if k.pulse_ms == 0 {
            return Err(ConfigError::ValidationFailed("knob.pulse_ms must be positive"));
        }
        if self.fault.threshold_mv == 0 {
            return Err(ConfigError::ValidationFailed("fault.threshold_mv must be positive"));
        }
        let b = &self.bus;
        if b.enter_auto_id == b.leave_auto_id
            || b.enter_auto_id == b.set_power_id
            || b.leave_auto_id == b.set_power_id
        {
            return Err(ConfigError::ValidationFailed("bus ids must be distinct"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be positive",
            ));
        }
        Ok(())
    }
}
