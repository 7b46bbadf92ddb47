//! Compositing glyph coverage masks onto raster images.

use std::ops::{Deref, DerefMut};

use glam::{uvec2, IVec2, UVec2};
use image::{ImageBuffer, Rgb, Rgba};
use palette::{Srgb, Srgba};

use crate::glyph::GlyphBitmap;

/// A raster surface that text can be drawn onto.
///
/// The origin is the top-left corner and y grows downward.
pub trait Canvas {
    /// Width and height in pixels.
    fn size(&self) -> UVec2;

    /// Blends `color` over the pixel at `(x, y)` with `alpha`,
    /// using source-over compositing. The pixel lies within
    /// [`size`](Canvas::size).
    fn blend_pixel(&mut self, x: u32, y: u32, color: Srgb<u8>, alpha: u8);
}

/// Source-over blend of a single 8-bit channel:
/// `dst * (1 - a) + src * a`, truncating.
pub fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    ((u32::from(src) * alpha + u32::from(dst) * (255 - alpha)) / 255) as u8
}

impl<C> Canvas for ImageBuffer<Rgba<u8>, C>
where
    C: Deref<Target = [u8]> + DerefMut,
{
    fn size(&self) -> UVec2 {
        uvec2(self.width(), self.height())
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Srgb<u8>, alpha: u8) {
        let pixel = self.get_pixel_mut(x, y);
        *pixel = blend_straight_alpha(*pixel, color, alpha);
    }
}

/// Source-over for straight (non-premultiplied) RGBA storage.
///
/// The per-channel blend is applied to premultiplied values and the
/// result divided back by the new alpha. Over an opaque pixel this is
/// exactly [`blend_channel`].
fn blend_straight_alpha(dst: Rgba<u8>, color: Srgb<u8>, alpha: u8) -> Rgba<u8> {
    let Rgba([r, g, b, dst_alpha]) = dst;
    let alpha = u32::from(alpha);
    let dst_weight = u32::from(dst_alpha) * (255 - alpha) / 255;
    let out_alpha = alpha + dst_weight;
    if out_alpha == 0 {
        return dst;
    }

    let channel = |dst: u8, src: u8| {
        ((u32::from(src) * alpha + u32::from(dst) * dst_weight) / out_alpha) as u8
    };
    Rgba([
        channel(r, color.red),
        channel(g, color.green),
        channel(b, color.blue),
        out_alpha as u8,
    ])
}

impl<C> Canvas for ImageBuffer<Rgb<u8>, C>
where
    C: Deref<Target = [u8]> + DerefMut,
{
    fn size(&self) -> UVec2 {
        uvec2(self.width(), self.height())
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Srgb<u8>, alpha: u8) {
        let Rgb([r, g, b]) = *self.get_pixel(x, y);
        self.put_pixel(
            x,
            y,
            Rgb([
                blend_channel(r, color.red, alpha),
                blend_channel(g, color.green, alpha),
                blend_channel(b, color.blue, alpha),
            ]),
        );
    }
}

/// Applies the text opacity to one coverage sample.
fn effective_alpha(coverage: u8, opacity: u8) -> u8 {
    if opacity == u8::MAX {
        coverage
    } else {
        (u32::from(coverage) * u32::from(opacity) / 255) as u8
    }
}

/// Draws a glyph with its top-left corner at `pos`.
///
/// `color.alpha` is the opacity of the text. The glyph is clipped to
/// the canvas; pixels outside the glyph's rectangle are never touched.
pub fn draw_glyph<C>(canvas: &mut C, glyph: &GlyphBitmap, pos: IVec2, color: Srgba<u8>)
where
    C: Canvas + ?Sized,
{
    if glyph.is_empty() || color.alpha == 0 {
        return;
    }

    let canvas_size = canvas.size().as_ivec2();
    let glyph_size = glyph.size().as_ivec2();
    let min = pos.max(IVec2::ZERO);
    let max = (pos + glyph_size).min(canvas_size);

    for y in min.y..max.y {
        for x in min.x..max.x {
            let coverage = glyph.alpha((x - pos.x) as u32, (y - pos.y) as u32);
            let alpha = effective_alpha(coverage, color.alpha);
            if alpha == 0 {
                continue;
            }
            canvas.blend_pixel(x as u32, y as u32, color.color, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use image::RgbaImage;

    use super::*;

    fn solid_glyph(width: u32, height: u32, coverage: u8) -> GlyphBitmap {
        GlyphBitmap::new(
            vec![coverage; (width * height) as usize],
            uvec2(width, height),
            IVec2::ZERO,
        )
    }

    fn black(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend_channel(10, 200, 0), 10);
        assert_eq!(blend_channel(10, 200, 255), 200);
        assert_eq!(blend_channel(0, 255, 128), 128);
        assert_eq!(blend_channel(255, 0, 128), 127);
    }

    #[test]
    fn opaque_text_uses_coverage_directly() {
        assert_eq!(effective_alpha(0, 255), 0);
        assert_eq!(effective_alpha(77, 255), 77);
        assert_eq!(effective_alpha(255, 255), 255);
    }

    #[test]
    fn opacity_scales_coverage_with_truncation() {
        assert_eq!(effective_alpha(255, 128), 128);
        assert_eq!(effective_alpha(100, 128), 50);
        // 1 * 128 / 255 truncates to zero
        assert_eq!(effective_alpha(1, 128), 0);
        assert_eq!(effective_alpha(255, 0), 0);
    }

    #[test]
    fn draws_inside_glyph_rect_only() {
        let mut image = black(6, 6);
        let glyph = solid_glyph(2, 3, 255);
        draw_glyph(&mut image, &glyph, ivec2(1, 2), Srgba::new(0, 255, 0, 255));

        for (x, y, pixel) in image.enumerate_pixels() {
            let inside = (1..3).contains(&x) && (2..5).contains(&y);
            let expected = if inside {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([0, 0, 0, 255])
            };
            assert_eq!(*pixel, expected, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn half_opacity_over_opaque_background() {
        let glyph = solid_glyph(1, 1, 255);

        let mut opaque = black(1, 1);
        draw_glyph(&mut opaque, &glyph, IVec2::ZERO, Srgba::new(255, 255, 0, 255));
        let mut half = black(1, 1);
        draw_glyph(&mut half, &glyph, IVec2::ZERO, Srgba::new(255, 255, 0, 128));

        assert_eq!(*opaque.get_pixel(0, 0), Rgba([255, 255, 0, 255]));
        assert_eq!(*half.get_pixel(0, 0), Rgba([128, 128, 0, 255]));
    }

    #[test]
    fn partial_coverage_at_partial_opacity() {
        let glyph = solid_glyph(1, 1, 200);
        let mut image = black(1, 1);
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(255, 255, 255, 128));

        // 200 * 128 / 255 = 100
        assert_eq!(*image.get_pixel(0, 0), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn blends_alpha_channel_of_transparent_canvas() {
        let glyph = solid_glyph(1, 1, 255);
        let mut image = RgbaImage::new(1, 1);
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(255, 0, 0, 128));
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn partial_coverage_keeps_text_color_on_transparent_canvas() {
        let glyph = solid_glyph(1, 1, 128);
        let mut image = RgbaImage::new(1, 1);
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(255, 255, 255, 255));
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 255, 255, 128]));
    }

    #[test]
    fn blends_over_translucent_pixel() {
        let glyph = solid_glyph(1, 1, 128);
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 128]));
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(255, 255, 255, 255));

        // dst weight 128 * 127 / 255 = 63, out alpha 191
        // red: 255 * 128 / 191 = 170
        assert_eq!(*image.get_pixel(0, 0), Rgba([170, 170, 255, 191]));
    }

    #[test]
    fn straight_alpha_matches_channel_blend_over_opaque() {
        let rng = fastrand::Rng::with_seed(3);
        for _ in 0..200 {
            let dst = Rgba([rng.u8(..), rng.u8(..), rng.u8(..), 255]);
            let color = Srgb::new(rng.u8(..), rng.u8(..), rng.u8(..));
            let alpha = rng.u8(..);

            let out = blend_straight_alpha(dst, color, alpha);
            assert_eq!(out[0], blend_channel(dst[0], color.red, alpha));
            assert_eq!(out[1], blend_channel(dst[1], color.green, alpha));
            assert_eq!(out[2], blend_channel(dst[2], color.blue, alpha));
            assert_eq!(out[3], 255);
        }
    }

    #[test]
    fn clips_to_canvas() {
        let glyph = solid_glyph(4, 4, 255);
        let color = Srgba::new(255, 255, 255, 255);

        let mut image = black(3, 3);
        draw_glyph(&mut image, &glyph, ivec2(-2, -2), color);
        draw_glyph(&mut image, &glyph, ivec2(2, 2), color);
        draw_glyph(&mut image, &glyph, ivec2(-10, 1), color);
        draw_glyph(&mut image, &glyph, ivec2(1, 100), color);

        let white: Vec<_> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] == 255)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(white, vec![(0, 0), (1, 0), (0, 1), (1, 1), (2, 2)]);
    }

    #[test]
    fn later_glyphs_composite_over_earlier() {
        let glyph = solid_glyph(1, 1, 255);
        let mut image = black(1, 1);
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(255, 0, 0, 255));
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(0, 0, 255, 128));
        assert_eq!(*image.get_pixel(0, 0), Rgba([127, 0, 128, 255]));
    }

    #[test]
    fn rgb_canvas() {
        let glyph = solid_glyph(1, 1, 255);
        let mut image = image::RgbImage::new(1, 1);
        draw_glyph(&mut image, &glyph, IVec2::ZERO, Srgba::new(0, 200, 0, 255));
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 200, 0]));
    }
}
