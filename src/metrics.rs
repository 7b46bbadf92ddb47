//! The metrics and rasterization contract that text layout
//! consumes from a font.
//!
//! Layout never touches font data directly. Everything it needs
//! goes through [`FontMetrics`], so alternative font backends (or
//! test fonts) can be plugged into a [`Font`](crate::Font).

/// Vertical font metrics in font units.
///
/// `descent` is negative for fonts whose descenders extend below
/// the baseline, following the TrueType `hhea` convention.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct VMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

/// Horizontal metrics of a single codepoint in font units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct HMetrics {
    pub advance_width: f32,
    pub left_side_bearing: f32,
}

/// Pixel bounding box of a rasterized glyph relative to its
/// pen position on the baseline. Y grows downward, so `y0` is
/// the top edge and `y1` the bottom edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct BitmapBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// An alpha coverage bitmap as produced by a rasterizer.
///
/// Rows are stored top to bottom, `width` bytes each.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Raster {
    pub coverage: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Per-codepoint metrics and rasterization for one font face.
///
/// Font-unit values are converted to pixels by multiplying with the
/// scale from [`scale_for_pixel_height`](FontMetrics::scale_for_pixel_height)
/// and rounding with [`round_px`].
///
/// Implementations signal a missing glyph by returning zeroed
/// metrics and an empty raster, never an error.
pub trait FontMetrics {
    /// The factor converting font units to pixels so that the
    /// font's ascent-to-descent span is `height` pixels tall.
    fn scale_for_pixel_height(&self, height: f32) -> f32;

    fn v_metrics(&self) -> VMetrics;

    fn h_metrics(&self, c: char) -> HMetrics;

    /// Kerning adjustment between two consecutive codepoints.
    fn kern_advance(&self, prev: char, c: char) -> f32;

    fn bitmap_box(&self, c: char, scale: f32) -> BitmapBox;

    fn rasterize(&self, c: char, scale: f32) -> Raster;
}

/// Converts a fractional pixel amount to an integer, rounding
/// half away from zero.
pub fn round_px(value: f32) -> i32 {
    if value < 0.0 {
        (value - 0.5) as i32
    } else {
        (value + 0.5) as i32
    }
}

/// Scales a font-unit value and rounds it to whole pixels.
pub(crate) fn scaled(value: f32, scale: f32) -> i32 {
    round_px(value * scale)
}
