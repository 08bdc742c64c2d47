//! Controller core: pure domain logic, zero I/O.
//!
//! Orchestrates the mode supervisor, the knob decoder and the fault
//! monitor. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer testable without peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
