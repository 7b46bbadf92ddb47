//! Text styling, layout, and block alignment.

mod align;
mod layout;

use palette::Srgba;
use serde::{Deserialize, Serialize};

pub use align::{resolve_origins, Align, Anchor, ParseAnchorError};
pub use layout::{BlockMetrics, Line, PositionedGlyph, TextLayout};

pub(crate) use layout::{lay_out, measure_lines};

/// Style used when drawing text.
///
/// The style is passed into every draw call, so changing it only
/// affects text drawn afterward.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Text color. The alpha channel is the opacity of the text.
    pub color: Srgba<u8>,
    /// Font height in pixels.
    ///
    /// A height of zero is accepted and draws nothing:
    /// every glyph and line collapses to zero size.
    pub pixel_height: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Srgba::new(0, 0, 0, u8::MAX),
            pixel_height: 20,
        }
    }
}

impl TextStyle {
    pub fn new(color: Srgba<u8>, pixel_height: u32) -> Self {
        Self {
            color,
            pixel_height,
        }
    }

    pub fn color(mut self, color: Srgba<u8>) -> Self {
        self.color = color;
        self
    }

    /// Sets the red, green, and blue channels, keeping the opacity.
    pub fn rgb(mut self, red: u8, green: u8, blue: u8) -> Self {
        self.color.color.red = red;
        self.color.color.green = green;
        self.color.color.blue = blue;
        self
    }

    /// Sets the opacity, where 255 is fully opaque.
    pub fn opacity(mut self, opacity: u8) -> Self {
        self.color.alpha = opacity;
        self
    }

    pub fn pixel_height(mut self, pixel_height: u32) -> Self {
        self.pixel_height = pixel_height;
        self
    }
}
