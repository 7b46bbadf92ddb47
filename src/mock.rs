//! A deterministic font for tests.
//!
//! Ascent is 768, descent -256 and the line gap 256, so at 32 pixels
//! the scale is exactly 1/32, the line height is 40 and the first
//! baseline sits 32 pixels below the top.
//!
//! Glyphs for printable ASCII are solid boxes spanning the glyph's
//! ink from its left side bearing to `advance - bearing`, 704 units
//! tall (`g` also descends 192 units). Space has no ink. Characters
//! outside ASCII are missing.

use std::cell::RefCell;

use ahash::AHashMap;

use crate::metrics::{BitmapBox, FontMetrics, HMetrics, Raster, VMetrics};

pub(crate) struct MockMetrics {
    rasterized: RefCell<AHashMap<char, usize>>,
}

impl MockMetrics {
    pub fn new() -> Self {
        Self {
            rasterized: RefCell::new(AHashMap::new()),
        }
    }

    /// How many times `c` was rasterized, at any size.
    pub fn rasterize_count(&self, c: char) -> usize {
        self.rasterized.borrow().get(&c).copied().unwrap_or(0)
    }

    pub fn total_rasterize_count(&self) -> usize {
        self.rasterized.borrow().values().sum()
    }

    fn has_glyph(c: char) -> bool {
        c.is_ascii() && !c.is_ascii_control()
    }
}

impl FontMetrics for MockMetrics {
    fn scale_for_pixel_height(&self, height: f32) -> f32 {
        let v = self.v_metrics();
        height / (v.ascent - v.descent)
    }

    fn v_metrics(&self) -> VMetrics {
        VMetrics {
            ascent: 768.0,
            descent: -256.0,
            line_gap: 256.0,
        }
    }

    fn h_metrics(&self, c: char) -> HMetrics {
        let (advance_width, left_side_bearing) = match c {
            _ if !Self::has_glyph(c) => (0.0, 0.0),
            'A' => (640.0, 64.0),
            'V' => (640.0, 0.0),
            'i' => (320.0, 96.0),
            ' ' => (256.0, 0.0),
            _ => (512.0, 32.0),
        };
        HMetrics {
            advance_width,
            left_side_bearing,
        }
    }

    fn kern_advance(&self, prev: char, c: char) -> f32 {
        match (prev, c) {
            ('A', 'V') | ('V', 'A') => -96.0,
            _ => 0.0,
        }
    }

    fn bitmap_box(&self, c: char, scale: f32) -> BitmapBox {
        if !Self::has_glyph(c) || c == ' ' {
            return BitmapBox::default();
        }
        let h = self.h_metrics(c);
        let descender = if c == 'g' { 192.0 } else { 0.0 };
        BitmapBox {
            x0: (h.left_side_bearing * scale).floor() as i32,
            y0: (-704.0 * scale).floor() as i32,
            x1: ((h.advance_width - h.left_side_bearing) * scale).ceil() as i32,
            y1: (descender * scale).ceil() as i32,
        }
    }

    fn rasterize(&self, c: char, scale: f32) -> Raster {
        *self.rasterized.borrow_mut().entry(c).or_insert(0) += 1;

        let bbox = self.bitmap_box(c, scale);
        let width = (bbox.x1 - bbox.x0).max(0) as u32;
        let height = (bbox.y1 - bbox.y0).max(0) as u32;
        Raster {
            coverage: vec![u8::MAX; (width * height) as usize],
            width,
            height,
        }
    }
}
