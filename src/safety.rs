//! Supply fault monitor.
//!
//! Runs **every tick after the FSM** and watches the DC/DC rail. A short
//! on the transformer output pulls the rail down; a momentary dip must not
//! trip the latch, so the condition has to hold for a full dwell window.
//!
//! ## Fault lifecycle
//!
//! 1. First low sample while the supply is enabled starts the timer.
//! 2. Any healthy sample, or the supply being disabled, stops it.
//!    There is no accumulation across interruptions.
//! 3. A low sample with the timer running for at least `dwell_ms`
//!    confirms the fault.
//! 4. The controller forces the FSM into `Fault`, whose entry disables
//!    the supply, which in turn stops the timer on the next sample.

use log::{debug, warn};

use crate::config::FaultConfig;
use crate::error::SafetyFault;

/// A validity-flagged elapsed-time interval in wrapping milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultTimer {
    started_ms: Option<u32>,
}

impl FaultTimer {
    pub const fn new() -> Self {
        Self { started_ms: None }
    }

    pub fn start(&mut self, now_ms: u32) {
        self.started_ms = Some(now_ms);
    }

    pub fn invalidate(&mut self) {
        self.started_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_ms.is_some()
    }

    /// `true` if running and at least `dwell_ms` have passed since start.
    pub fn has_expired(&self, now_ms: u32, dwell_ms: u32) -> bool {
        self.started_ms
            .is_some_and(|start| now_ms.wrapping_sub(start) >= dwell_ms)
    }
}

/// Debounced under-voltage detector.
pub struct FaultMonitor {
    threshold_mv: u32,
    dwell_ms: u32,
    timer: FaultTimer,
}

impl FaultMonitor {
    pub fn new(config: &FaultConfig) -> Self {
        Self {
            threshold_mv: config.threshold_mv,
            dwell_ms: config.dwell_ms,
            timer: FaultTimer::new(),
        }
    }

    /// Feed one sample. Returns the confirmed fault, if any.
    ///
    /// `supply_enabled` is the "currently providing power" context: a low
    /// rail with the converter switched off is expected, not a fault.
    pub fn evaluate(&mut self, supply_mv: u32, supply_enabled: bool, now_ms: u32) -> Option<SafetyFault> {
        if supply_mv >= self.threshold_mv || !supply_enabled {
            if self.timer.is_running() {
                debug!("fault monitor: rail recovered ({} mV), timer reset", supply_mv);
            }
            self.timer.invalidate();
            return None;
        }

        if !self.timer.is_running() {
            debug!("fault monitor: rail low ({} mV), timing", supply_mv);
            self.timer.start(now_ms);
            return None;
        }

        if self.timer.has_expired(now_ms, self.dwell_ms) {
            warn!(
                "fault monitor: rail below {} mV for {} ms",
                self.threshold_mv, self.dwell_ms
            );
            return Some(SafetyFault::SupplyUndervoltage { supply_mv });
        }

        None
    }

    /// Whether a low rail is currently being timed.
    pub fn is_timing(&self) -> bool {
        self.timer.is_running()
    }
}
