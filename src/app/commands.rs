//! Inbound bus commands.
//!
//! The bus receiver hands over raw [`BusFrame`]s; only three identifiers
//! mean anything to the supervisor. Everything else (unknown ids, short
//! payloads) decodes to `None` and is dropped without side effects.

use heapless::Vec;
use log::debug;

use crate::config::BusConfig;

/// Maximum payload of a classic CAN frame.
pub const MAX_PAYLOAD: usize = 8;

/// A raw inbound bus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusFrame {
    pub id: u32,
    pub data: Vec<u8, MAX_PAYLOAD>,
}

impl BusFrame {
    /// Build a frame, truncating the payload to [`MAX_PAYLOAD`] bytes.
    pub fn new(id: u32, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_PAYLOAD);
        let mut data = Vec::new();
        // Cannot fail: `len` is bounded by the capacity.
        let _ = data.extend_from_slice(&payload[..len]);
        Self { id, data }
    }
}

/// Commands the supervisor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCommand {
    /// Hand control to the bus.
    EnterAuto,
    /// Return control to the knob.
    LeaveAuto,
    /// Drive the output at a signed power level (only honoured in Auto).
    SetPower(i32),
}

impl BusCommand {
    /// Decode a frame against the configured identifiers.
    ///
    /// `SetPower` carries `[magnitude, sign]`; a sign byte of `0` negates
    /// the magnitude. Extra payload bytes are ignored.
    pub fn decode(frame: &BusFrame, ids: &BusConfig) -> Option<Self> {
        if frame.id == ids.enter_auto_id {
            Some(Self::EnterAuto)
        } else if frame.id == ids.leave_auto_id {
            Some(Self::LeaveAuto)
        } else if frame.id == ids.set_power_id {
            match frame.data.as_slice() {
                [magnitude, sign, ..] => {
                    let power = i32::from(*magnitude);
                    Some(Self::SetPower(if *sign == 0 { -power } else { power }))
                }
                short => {
                    debug!(
                        "bus: set-power frame with {} byte payload ignored",
                        short.len()
                    );
                    None
                }
            }
        } else {
            None
        }
    }
}
