//! Line breaking and glyph positioning.
//!
//! Text is split into lines on `'\n'` only; there is no wrapping.
//! Within a line, glyphs are placed left to right using the font's
//! advance widths, left side bearings, and kerning pairs, all
//! rounded to whole pixels with [`round_px`](crate::metrics::round_px).

use std::sync::Arc;

use glam::{ivec2, uvec2, IVec2, UVec2};

use crate::{
    glyph::{GlyphBitmap, GlyphCache},
    metrics::{scaled, FontMetrics},
};

const LINE_BREAK: char = '\n';

/// Vertical line spacing of a font at one pixel height.
#[derive(Copy, Clone, Debug)]
struct Spacing {
    scale: f32,
    line_height: i32,
    /// Distance from the top of a line to its baseline.
    baseline: i32,
}

impl Spacing {
    fn new(metrics: &impl FontMetrics, pixel_height: u32) -> Self {
        let scale = metrics.scale_for_pixel_height(pixel_height as f32);
        let v = metrics.v_metrics();
        Self {
            scale,
            line_height: scaled(v.ascent - v.descent + v.line_gap, scale),
            baseline: scaled(v.ascent + v.line_gap, scale),
        }
    }
}

/// The horizontal pen of a single line.
struct Pen<'a, M> {
    metrics: &'a M,
    scale: f32,
    x: i32,
    max_x: i32,
    prev: Option<char>,
}

impl<'a, M: FontMetrics> Pen<'a, M> {
    fn new(metrics: &'a M, scale: f32) -> Self {
        Self {
            metrics,
            scale,
            x: 0,
            max_x: 0,
            prev: None,
        }
    }

    /// Moves the pen past `c`. Returns the x coordinate of the
    /// glyph's own origin, which includes its left side bearing.
    fn advance(&mut self, c: char) -> i32 {
        let h = self.metrics.h_metrics(c);
        let origin = self.x + scaled(h.left_side_bearing, self.scale);

        // The kerning pair is applied to the pen after `c`.
        let kerning = match self.prev {
            Some(prev) => scaled(self.metrics.kern_advance(prev, c), self.scale),
            None => 0,
        };
        self.x += scaled(h.advance_width, self.scale) + kerning;
        self.max_x = self.max_x.max(self.x);
        self.prev = Some(c);

        origin
    }
}

/// Measurements of a block of lines, without glyph bitmaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockMetrics {
    pub line_height: i32,
    /// Distance from the top of a line to its baseline.
    pub baseline: i32,
    /// The furthest pen position reached on each line.
    pub line_widths: Vec<i32>,
}

impl BlockMetrics {
    pub fn line_count(&self) -> usize {
        self.line_widths.len()
    }

    /// Width of the widest line.
    pub fn width(&self) -> i32 {
        self.line_widths.iter().copied().max().unwrap_or_default()
    }

    pub fn height(&self) -> i32 {
        self.line_height * self.line_count() as i32
    }

    pub fn size(&self) -> UVec2 {
        uvec2(self.width().max(0) as u32, self.height().max(0) as u32)
    }
}

/// A glyph placed within a [`TextLayout`].
#[derive(Clone, Debug)]
pub struct PositionedGlyph {
    pub c: char,
    /// Top-left corner of the bitmap relative to the top-left
    /// of the text block.
    pub pos: IVec2,
    pub bitmap: Arc<GlyphBitmap>,
}

/// One line of a [`TextLayout`].
#[derive(Clone, Debug, Default)]
pub struct Line {
    pub glyphs: Vec<PositionedGlyph>,
    /// The furthest pen position reached on this line.
    pub width: i32,
    /// The pen position after the last glyph.
    pub end: i32,
}

/// Text that has been split into lines with every glyph positioned
/// and rasterized, ready to be drawn.
#[derive(Clone, Debug)]
pub struct TextLayout {
    lines: Vec<Line>,
    line_height: i32,
    baseline: i32,
}

impl TextLayout {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    pub fn block_metrics(&self) -> BlockMetrics {
        BlockMetrics {
            line_height: self.line_height,
            baseline: self.baseline,
            line_widths: self.lines.iter().map(|line| line.width).collect(),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.block_metrics().size()
    }
}

/// Lays out `text`, rasterizing glyphs through `cache` as needed.
pub(crate) fn lay_out<M: FontMetrics>(
    metrics: &M,
    cache: &mut GlyphCache,
    text: &str,
    pixel_height: u32,
) -> TextLayout {
    let spacing = Spacing::new(metrics, pixel_height);

    let mut lines = Vec::new();
    let mut pen_y = spacing.baseline;
    for line_text in text.split(LINE_BREAK) {
        let mut pen = Pen::new(metrics, spacing.scale);
        let mut glyphs = Vec::with_capacity(line_text.len());

        for c in line_text.chars() {
            let origin_x = pen.advance(c);
            let bitmap = cache.glyph_or_rasterize(metrics, c, pixel_height);
            let offset = bitmap.offset();
            let pos = ivec2(
                origin_x + offset.x,
                pen_y + offset.y - bitmap.height() as i32,
            );
            glyphs.push(PositionedGlyph { c, pos, bitmap });
        }

        lines.push(Line {
            glyphs,
            width: pen.max_x,
            end: pen.x,
        });
        pen_y += spacing.line_height;
    }

    TextLayout {
        lines,
        line_height: spacing.line_height,
        baseline: spacing.baseline,
    }
}

/// Measures `text` line by line without touching any bitmaps.
pub(crate) fn measure_lines<M: FontMetrics>(
    metrics: &M,
    text: &str,
    pixel_height: u32,
) -> BlockMetrics {
    let spacing = Spacing::new(metrics, pixel_height);

    let line_widths = text
        .split(LINE_BREAK)
        .map(|line_text| {
            let mut pen = Pen::new(metrics, spacing.scale);
            line_text.chars().for_each(|c| {
                pen.advance(c);
            });
            pen.max_x
        })
        .collect();

    BlockMetrics {
        line_height: spacing.line_height,
        baseline: spacing.baseline,
        line_widths,
    }
}
