//! Background fill layer.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform,
};

use super::{Layer, RenderContext};
use crate::error::{RenderError, Result};
use crate::style::{Background, GradientPreset};

/// Fills the whole surface with a gradient preset or a solid color.
///
/// Gradients run diagonally from the top-left corner (first stop) to the
/// bottom-right corner (second stop).
#[derive(Debug, Clone, Copy)]
pub struct BackgroundLayer {
    pub background: Background,
}

impl BackgroundLayer {
    pub fn new(background: Background) -> Self {
        Self { background }
    }
}

impl Layer for BackgroundLayer {
    fn paint(&self, ctx: &mut RenderContext) -> Result<()> {
        let size = ctx.geometry.size;
        let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::SurfaceUnavailable { size })?;

        match self.background {
            Background::Solid(color) => pixmap.fill(to_skia(color)),
            Background::Gradient(preset) => fill_gradient(&mut pixmap, preset)?,
        }

        ctx.image = pixmap_to_rgba_image(&pixmap);
        Ok(())
    }
}

fn fill_gradient(pixmap: &mut Pixmap, preset: &GradientPreset) -> Result<()> {
    let size = pixmap.width();
    let extent = size as f32;
    let unavailable = || RenderError::SurfaceUnavailable { size };

    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(extent, extent),
        vec![
            GradientStop::new(0.0, to_skia(preset.start)),
            GradientStop::new(1.0, to_skia(preset.end)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(unavailable)?;

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.anti_alias = false;

    let rect = Rect::from_xywh(0.0, 0.0, extent, extent).ok_or_else(unavailable)?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(())
}

fn to_skia(color: Rgba<u8>) -> Color {
    let [r, g, b, a] = color.0;
    Color::from_rgba8(r, g, b, a)
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
///
/// tiny_skia stores premultiplied alpha; the image crate expects straight
/// alpha.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (src, dst) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{GRADIENT_PRESETS, WHITE};

    fn painted(background: Background, size: u32) -> RgbaImage {
        let mut ctx = RenderContext::new(size).unwrap();
        BackgroundLayer::new(background).paint(&mut ctx).unwrap();
        ctx.image
    }

    fn close(a: Rgba<u8>, b: Rgba<u8>, tolerance: u8) -> bool {
        a.0.iter().zip(b.0.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
    }

    #[test]
    fn solid_fill_covers_every_pixel() {
        let img = painted(Background::Solid(Rgba([0, 0, 0, 255])), 16);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn unknown_gradient_fallback_is_white() {
        let bg = Background::parse("gradient-does-not-exist").unwrap();
        let img = painted(bg, 8);
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn gradient_runs_corner_to_corner() {
        let preset = &GRADIENT_PRESETS[0];
        let img = painted(Background::Gradient(preset), 64);

        assert!(close(*img.get_pixel(0, 0), preset.start, 4));
        assert!(close(*img.get_pixel(63, 63), preset.end, 4));

        // Pixels on the same anti-diagonal share a gradient position.
        assert!(close(*img.get_pixel(0, 63), *img.get_pixel(63, 0), 1));
        assert!(img.pixels().all(|p| p[3] == 255));
    }
}
