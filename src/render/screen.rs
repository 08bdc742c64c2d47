//! Screen layout.
//!
//! Pure view model for the 128×128 status display: what to draw, not how.
//! The [`Display`](crate::app::ports::Display) adapter turns a [`Screen`]
//! into pixels.

use core::fmt::Write as _;

use heapless::String;

use super::RenderRequest;
use crate::config::Rgb;

pub const RED: Rgb = (255, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);
pub const BLACK: Rgb = (0, 0, 0);

/// Footer label pointing at the physical override key.
pub const FOOTER: &str = "Stop >";

/// Text scale of the power readout.
pub const POWER_SCALE: u8 = 4;
/// Text scale of the fault marker.
pub const FAULT_SCALE: u8 = 8;

/// Direction marker drawn beside the readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    /// `<` at the left edge (reverse).
    Left,
    /// `>` at the right edge (forward).
    Right,
}

impl Arrow {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Left => "<",
            Self::Right => ">",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub background: Rgb,
    pub foreground: Rgb,
    /// Centred headline text.
    pub headline: String<12>,
    pub headline_scale: u8,
    pub arrow: Option<Arrow>,
    /// Bottom-right footer label.
    pub footer: &'static str,
}

impl Screen {
    pub fn layout(request: &RenderRequest) -> Self {
        match *request {
            RenderRequest::Power {
                background,
                foreground,
                power,
            } => {
                let mut headline = String::new();
                // 10 digits max for |i32|, always fits.
                let _ = write!(headline, "{}", power.unsigned_abs());
                let arrow = match power.signum() {
                    1 => Some(Arrow::Right),
                    -1 => Some(Arrow::Left),
                    _ => None,
                };
                Self {
                    background,
                    foreground: foreground.unwrap_or(BLACK),
                    headline,
                    headline_scale: POWER_SCALE,
                    arrow,
                    footer: FOOTER,
                }
            }
            RenderRequest::Fault => {
                let mut headline = String::new();
                let _ = headline.push('!');
                Self {
                    background: RED,
                    foreground: WHITE,
                    headline,
                    headline_scale: FAULT_SCALE,
                    arrow: None,
                    footer: FOOTER,
                }
            }
        }
    }
}
