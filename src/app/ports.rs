//! Port traits: the boundary between the control core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (encoder chip, output stage, bus receiver, display,
//! event sinks, config storage) implement these traits. The
//! [`Controller`](super::service::Controller) and the render task consume
//! them via generics, so the core never touches registers directly.

use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::render::screen::Screen;

use super::commands::BusFrame;

// ───────────────────────────────────────────────────────────────
// Knob port (encoder / stepper chip)
// ───────────────────────────────────────────────────────────────

/// The motor-driver chip behind the knob: it counts encoder steps and can
/// hold the shaft with a configurable current for tactile feedback.
pub trait KnobPort {
    /// Current hardware encoder count.
    fn read_encoder(&mut self) -> i32;

    /// Overwrite the hardware encoder count (re-zero or clamp).
    fn write_encoder(&mut self, value: i32);

    /// Set the hold current. `0` switches the driver stage off.
    /// Implementations saturate at the chip's maximum.
    fn set_hold_current(&mut self, level: u8);

    /// Busy-wait. Only called from explicit re-zero paths.
    fn delay_us(&mut self, us: u32);
}

// ───────────────────────────────────────────────────────────────
// Output port (transformer stage)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the supervisor commands the power stage through this.
pub trait OutputPort {
    /// Enable or disable the DC/DC supply feeding the stage.
    fn set_supply(&mut self, enabled: bool);

    /// Whether the supply is currently enabled.
    fn supply_enabled(&self) -> bool;

    /// Set the signed power level. `0` = off, sign = direction,
    /// magnitude = duty intensity.
    fn set_power(&mut self, power: i32);

    /// The power level currently applied (after any clamping).
    fn power(&self) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (supply rail + operator key)
// ───────────────────────────────────────────────────────────────

/// Read-side port sampled once per control tick.
pub trait SensorPort {
    /// DC/DC rail voltage in millivolts.
    fn read_supply_mv(&mut self) -> u32;

    /// `true` once per debounced press of the override key.
    fn key_pressed(&mut self, now_ms: u32) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Command port (bus receiver)
// ───────────────────────────────────────────────────────────────

/// Inbound bus frames. At most one frame is consumed per tick.
pub trait CommandPort {
    fn poll(&mut self) -> Option<BusFrame>;
}

// ───────────────────────────────────────────────────────────────
// Display port (render consumer side)
// ───────────────────────────────────────────────────────────────

/// Draws a fully laid-out [`Screen`]. Called only from the render task.
pub trait Display {
    fn show(&mut self, screen: &Screen);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`ControllerEvent`](super::events::ControllerEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration. Returns [`ControllerConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> Result<ControllerConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError>;
}
