use std::{collections::hash_map::Entry, sync::Arc};

use ahash::AHashMap;
use glam::{ivec2, uvec2, IVec2, UVec2};

use crate::metrics::{BitmapBox, FontMetrics, Raster};

/// A rasterized glyph: an 8-bit coverage mask plus the offset of
/// its bounding box from the pen position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    coverage: Vec<u8>,
    size: UVec2,
    /// `(x0, y1)` of the glyph's bitmap box: left edge and bottom
    /// edge relative to the pen on the baseline.
    offset: IVec2,
}

impl GlyphBitmap {
    /// Creates a glyph bitmap. `coverage` holds `size.x * size.y`
    /// bytes in row-major order, top row first.
    ///
    /// # Panics
    /// Panics if `coverage.len()` is not `size.x * size.y`.
    pub fn new(coverage: Vec<u8>, size: UVec2, offset: IVec2) -> Self {
        assert_eq!(
            coverage.len(),
            (size.x * size.y) as usize,
            "coverage length does not match bitmap size"
        );
        Self {
            coverage,
            size,
            offset,
        }
    }

    /// A zero-sized glyph, used for whitespace and missing glyphs.
    pub fn empty() -> Self {
        Self {
            coverage: Vec::new(),
            size: UVec2::ZERO,
            offset: IVec2::ZERO,
        }
    }

    pub(crate) fn from_raster(raster: Raster, bbox: BitmapBox) -> Self {
        let Raster {
            coverage,
            width,
            height,
        } = raster;
        if width == 0 || height == 0 || coverage.len() != (width * height) as usize {
            return Self::empty();
        }
        Self {
            coverage,
            size: uvec2(width, height),
            offset: ivec2(bbox.x0, bbox.y1),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    /// Whether the glyph has no visible pixels to draw.
    pub fn is_empty(&self) -> bool {
        self.size.x == 0 || self.size.y == 0
    }

    /// Coverage at a pixel inside the bitmap.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.size.x + x) as usize]
    }
}

/// A cache of rasterized glyphs.
///
/// Glyphs are keyed by pixel height and then by character.
/// Entries are never evicted; a glyph is rasterized at most once
/// for each distinct height.
#[derive(Debug, Default)]
pub struct GlyphCache {
    sizes: AHashMap<u32, AHashMap<char, Arc<GlyphBitmap>>>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the bitmap for `c` at `pixel_height`, rasterizing it
    /// with `metrics` on the first request.
    pub fn glyph_or_rasterize(
        &mut self,
        metrics: &impl FontMetrics,
        c: char,
        pixel_height: u32,
    ) -> Arc<GlyphBitmap> {
        let glyphs = self.sizes.entry(pixel_height).or_default();
        match glyphs.entry(c) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let scale = metrics.scale_for_pixel_height(pixel_height as f32);
                let raster = metrics.rasterize(c, scale);
                let bbox = metrics.bitmap_box(c, scale);
                log::trace!(
                    "Rasterized {:?} at {}px ({}x{})",
                    c,
                    pixel_height,
                    raster.width,
                    raster.height
                );
                let glyph = Arc::new(GlyphBitmap::from_raster(raster, bbox));
                Arc::clone(entry.insert(glyph))
            }
        }
    }

    /// Gets a previously rasterized glyph without rasterizing.
    pub fn get(&self, c: char, pixel_height: u32) -> Option<&Arc<GlyphBitmap>> {
        self.sizes.get(&pixel_height)?.get(&c)
    }

    /// The number of cached glyphs across all sizes.
    pub fn len(&self) -> usize {
        self.sizes.values().map(|glyphs| glyphs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
