//! Transformer controller core.
//!
//! Knob decoding, mode supervision, supply fault detection and display
//! hand-off for a bidirectional transformer power stage. Hardware sits
//! behind the port traits in [`app::ports`]; [`adapters`] provides the host
//! implementations used by the simulator and the tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod knob;
pub mod render;
pub mod safety;
