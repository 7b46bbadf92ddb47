//! Writes multi-line text onto a black image, then overlays a larger,
//! half-transparent block centered on the image.
//!
//! Usage: `cargo run --example overlay -- <font.ttf> [output.png]`

use anyhow::Context as _;
use glam::ivec2;
use image::{Rgba, RgbaImage};
use rastext::{Anchor, Font, TextStyle};

const BACKGROUND_TEXT: &str = "This is some text with line
breaks in it. \\n is used for
line breaks; do not place
any \\r in the string, even
if you are on Windows ;-)";

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()
        .unwrap();

    let mut args = std::env::args().skip(1);
    let font_path = args
        .next()
        .context("usage: overlay <font.ttf> [output.png]")?;
    let output = args.next().unwrap_or_else(|| "overlay.png".to_owned());

    let mut font = Font::from_file(&font_path)
        .with_context(|| format!("failed to load font '{}'", font_path))?;

    let mut image = RgbaImage::from_pixel(300, 200, Rgba([0, 0, 0, 255]));

    // Solid green, top-left
    let style = TextStyle::default().rgb(0, 255, 0).pixel_height(25);
    font.write(&mut image, BACKGROUND_TEXT, &style, ivec2(0, 0));

    // Half-transparent yellow, centered
    let style = style.rgb(255, 255, 0).opacity(128).pixel_height(50);
    font.write_anchored(
        &mut image,
        "Centered\noverlay",
        &style,
        ivec2(150, 100),
        Anchor::CENTER,
    );

    image
        .save(&output)
        .with_context(|| format!("failed to write '{}'", output))?;
    Ok(())
}
