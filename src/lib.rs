//! Draws text directly into raster images.
//!
//! A [`Font`] lays out text line by line, rasterizes glyphs into
//! a cache of coverage masks, and composites them onto any
//! [`Canvas`], such as an `image::RgbaImage`. Blocks of text can be
//! placed relative to an anchor point with [`Font::write_anchored`].

mod canvas;
mod font;
mod glyph;
pub mod metrics;
mod shared;
mod text;

#[cfg(test)]
mod mock;

pub use canvas::{blend_channel, draw_glyph, Canvas};
pub use font::{Font, FontError, FontdueMetrics, MalformedFont};
pub use glyph::{GlyphBitmap, GlyphCache};
pub use metrics::FontMetrics;
pub use shared::SharedFont;
pub use text::{
    resolve_origins, Align, Anchor, BlockMetrics, Line, ParseAnchorError, PositionedGlyph,
    TextLayout, TextStyle,
};
