//! Fonts and the text drawing entry points.
//!
//! Font parsing and glyph rasterization is handled by the `fontdue` crate.

use std::{fs, io::Read, path::Path};

use glam::{ivec2, IVec2, UVec2};

use crate::{
    canvas::{draw_glyph, Canvas},
    glyph::GlyphCache,
    metrics::{BitmapBox, FontMetrics, HMetrics, Raster, VMetrics},
    text::{lay_out, measure_lines, resolve_origins, Anchor, BlockMetrics, TextLayout, TextStyle},
};

#[derive(Debug, thiserror::Error)]
#[error("failed to parse font as TTF/OTF font data: {0}")]
pub struct MalformedFont(String);

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font data")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedFont),
}

/// [`FontMetrics`] for a TrueType or OpenType font loaded with `fontdue`.
pub struct FontdueMetrics {
    font: fontdue::Font,
    units_per_em: f32,
    v_metrics: VMetrics,
}

impl FontdueMetrics {
    pub fn from_bytes(data: &[u8]) -> Result<Self, MalformedFont> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| MalformedFont(e.to_owned()))?;
        Ok(Self::new(font))
    }

    pub fn new(font: fontdue::Font) -> Self {
        let units_per_em = font.units_per_em();
        // Line metrics at one pixel per font unit are in font units.
        let v_metrics = match font.horizontal_line_metrics(units_per_em) {
            Some(line) => VMetrics {
                ascent: line.ascent,
                descent: line.descent,
                line_gap: line.line_gap,
            },
            None => {
                log::warn!("Font has no horizontal line metrics; using the em box");
                VMetrics {
                    ascent: units_per_em,
                    descent: 0.0,
                    line_gap: 0.0,
                }
            }
        };
        log::info!(
            "Loaded font ({} glyphs, {} units per em)",
            font.glyph_count(),
            units_per_em
        );

        Self {
            font,
            units_per_em,
            v_metrics,
        }
    }

    /// The underlying `fontdue` font.
    pub fn font(&self) -> &fontdue::Font {
        &self.font
    }

    fn has_glyph(&self, c: char) -> bool {
        self.font.lookup_glyph_index(c) != 0
    }

    /// The `fontdue` size for a font-units-to-pixels scale.
    fn px(&self, scale: f32) -> f32 {
        scale * self.units_per_em
    }
}

impl FontMetrics for FontdueMetrics {
    fn scale_for_pixel_height(&self, height: f32) -> f32 {
        let span = self.v_metrics.ascent - self.v_metrics.descent;
        if span <= 0.0 {
            return 0.0;
        }
        height / span
    }

    fn v_metrics(&self) -> VMetrics {
        self.v_metrics
    }

    fn h_metrics(&self, c: char) -> HMetrics {
        if !self.has_glyph(c) {
            return HMetrics::default();
        }
        let metrics = self.font.metrics(c, self.units_per_em);
        HMetrics {
            advance_width: metrics.advance_width,
            left_side_bearing: metrics.bounds.xmin,
        }
    }

    fn kern_advance(&self, prev: char, c: char) -> f32 {
        self.font
            .horizontal_kern(prev, c, self.units_per_em)
            .unwrap_or_default()
    }

    fn bitmap_box(&self, c: char, scale: f32) -> BitmapBox {
        if !self.has_glyph(c) {
            return BitmapBox::default();
        }
        // fontdue's bounds are y-up with `ymin` at the bottom edge.
        let metrics = self.font.metrics(c, self.px(scale));
        BitmapBox {
            x0: metrics.xmin,
            y0: -(metrics.ymin + metrics.height as i32),
            x1: metrics.xmin + metrics.width as i32,
            y1: -metrics.ymin,
        }
    }

    fn rasterize(&self, c: char, scale: f32) -> Raster {
        if !self.has_glyph(c) {
            return Raster::default();
        }
        let (metrics, coverage) = self.font.rasterize(c, self.px(scale));
        Raster {
            coverage,
            width: metrics.width as u32,
            height: metrics.height as u32,
        }
    }
}

/// A font together with its cache of rasterized glyphs.
///
/// Style is not part of the font: each drawing call takes a
/// [`TextStyle`], so one font can draw text in any color and size.
///
/// Drawing needs `&mut self` to fill the glyph cache. To share a font
/// between threads, wrap it in a [`SharedFont`](crate::SharedFont).
pub struct Font<M = FontdueMetrics> {
    metrics: M,
    glyph_cache: GlyphCache,
}

impl Font<FontdueMetrics> {
    /// Loads a font from TTF/OTF data.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MalformedFont> {
        Ok(Self::with_metrics(FontdueMetrics::from_bytes(data)?))
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, FontError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(&data)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let data = fs::read(path)?;
        Ok(Self::from_bytes(&data)?)
    }
}

impl<M: FontMetrics> Font<M> {
    /// Creates a font from any metrics provider.
    pub fn with_metrics(metrics: M) -> Self {
        Self {
            metrics,
            glyph_cache: GlyphCache::new(),
        }
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyph_cache
    }

    /// Gets the width and height of `text` at `pixel_height`.
    ///
    /// The width is that of the widest line; the height is the
    /// line height times the number of lines.
    pub fn measure(&self, text: &str, pixel_height: u32) -> UVec2 {
        self.measure_lines(text, pixel_height).size()
    }

    /// Gets the width of each line of `text` along with the line spacing.
    pub fn measure_lines(&self, text: &str, pixel_height: u32) -> BlockMetrics {
        measure_lines(&self.metrics, text, pixel_height)
    }

    /// Lays out `text` at `pixel_height`, rasterizing any glyphs
    /// that are not cached yet.
    pub fn layout(&mut self, text: &str, pixel_height: u32) -> TextLayout {
        lay_out(&self.metrics, &mut self.glyph_cache, text, pixel_height)
    }

    /// Draws `text` with its top-left corner at `pos`.
    ///
    /// Returns the pen position after the last glyph: the x coordinate
    /// right after the last line and the y coordinate of that line's top.
    pub fn write<C>(&mut self, canvas: &mut C, text: &str, style: &TextStyle, pos: IVec2) -> IVec2
    where
        C: Canvas + ?Sized,
    {
        let layout = self.layout(text, style.pixel_height);
        draw_layout(canvas, &layout, style, |_| pos);

        let last_line = layout.lines().len().saturating_sub(1) as i32;
        let end_x = layout.lines().last().map(|line| line.end).unwrap_or_default();
        ivec2(pos.x + end_x, pos.y + last_line * layout.line_height())
    }

    /// Draws `text` so that the point of the text block selected by
    /// `anchor` ends up at `anchor_point`.
    ///
    /// Each line is aligned horizontally on its own.
    pub fn write_anchored<C>(
        &mut self,
        canvas: &mut C,
        text: &str,
        style: &TextStyle,
        anchor_point: IVec2,
        anchor: Anchor,
    ) where
        C: Canvas + ?Sized,
    {
        let layout = self.layout(text, style.pixel_height);
        let origins = resolve_origins(&layout.block_metrics(), anchor_point, anchor);
        log::debug!(
            "Anchored {} line(s) at {} ({}): first origin {:?}",
            origins.len(),
            anchor_point,
            anchor,
            origins.first()
        );
        draw_layout(canvas, &layout, style, |line| origins[line]);
    }
}

/// Draws every glyph of `layout`, offsetting each line by `line_origin`.
fn draw_layout<C>(
    canvas: &mut C,
    layout: &TextLayout,
    style: &TextStyle,
    line_origin: impl Fn(usize) -> IVec2,
) where
    C: Canvas + ?Sized,
{
    for (i, line) in layout.lines().iter().enumerate() {
        let origin = line_origin(i);
        for glyph in &line.glyphs {
            draw_glyph(canvas, &glyph.bitmap, origin + glyph.pos, style.color);
        }
    }
}
