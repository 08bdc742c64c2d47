//! Render hand-off between the control loop and the display thread.
//!
//! ```text
//! ┌──────────────┐  RenderRequest  ┌──────────────┐  Screen  ┌─────────┐
//! │ Control loop │───────────────▶│  RenderTask  │─────────▶│ Display │
//! │  (producer)  │  UpdateChannel  │  (consumer)  │          │  port   │
//! └──────────────┘   2 slots,      └──────────────┘          └─────────┘
//!                    drop-oldest
//! ```
//!
//! The control loop never blocks on the display: a full channel loses its
//! oldest entry. The render side only ever needs the current status.

pub mod channel;
pub mod screen;
pub mod task;

use crate::config::{Palette, Rgb};

/// One render job, copied by value through the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    /// Operating screen showing a signed power level.
    Power {
        background: Rgb,
        foreground: Option<Rgb>,
        power: i32,
    },
    /// Short-circuit / under-voltage latch screen.
    Fault,
}

impl RenderRequest {
    /// Manual-mode screen for the given knob position.
    pub fn manual(palette: &Palette, power: i32) -> Self {
        Self::Power {
            background: palette.manual_bg,
            foreground: Some(palette.manual_fg),
            power,
        }
    }

    /// Auto-mode screen for the given commanded power.
    pub fn auto(palette: &Palette, power: i32) -> Self {
        Self::Power {
            background: palette.auto_bg,
            foreground: Some(palette.auto_fg),
            power,
        }
    }
}
