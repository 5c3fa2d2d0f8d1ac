//! Page-number footer layer.

use image::Rgba;

use super::{Layer, RenderContext};
use crate::error::Result;
use crate::font::Typeface;

/// Footer font size as a fraction of the body font size.
pub const FOOTER_SCALE: f32 = 0.8;

/// Vertical room kept free for the footer when laying out body text.
pub const FOOTER_RESERVE: f32 = 30.0;

/// Formats the 1-based page label, e.g. `"2/5"` for index 1 of 5.
pub fn page_label(index: usize, total: usize) -> String {
    format!("{}/{}", index + 1, total)
}

/// Draws the `"{n}/{total}"` label centered near the bottom edge.
///
/// The label's top edge sits half a padding above the bottom of the slide.
pub struct FooterLayer<'a, F: Typeface> {
    pub index: usize,
    pub total: usize,
    pub typeface: &'a F,
    /// Body font size; the footer is drawn at [`FOOTER_SCALE`] of it.
    pub font_size: f32,
    pub color: Rgba<u8>,
}

impl<F: Typeface> FooterLayer<'_, F> {
    /// Returns the label text and its top-left corner.
    pub fn placement(&self, size: u32, padding: f32) -> (String, f32, f32) {
        let label = page_label(self.index, self.total);
        let px = self.font_size * FOOTER_SCALE;
        let width = self.typeface.measure(&label, px);
        let x = size as f32 / 2.0 - width / 2.0;
        let y = size as f32 - padding / 2.0;
        (label, x, y)
    }
}

impl<F: Typeface> Layer for FooterLayer<'_, F> {
    fn paint(&self, ctx: &mut RenderContext) -> Result<()> {
        let geometry = ctx.geometry;
        let (label, x, y) = self.placement(geometry.size, geometry.padding);
        let px = self.font_size * FOOTER_SCALE;

        self.typeface.draw(&mut ctx.image, &label, x, y, px, self.color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::BlockFace;

    #[test]
    fn label_is_one_based() {
        assert_eq!(page_label(0, 1), "1/1");
        assert_eq!(page_label(4, 12), "5/12");
    }

    #[test]
    fn label_is_centered() {
        let footer = FooterLayer {
            index: 2,
            total: 10,
            typeface: &BlockFace,
            font_size: 25.0,
            color: Rgba([0, 0, 0, 255]),
        };

        // "3/10" at 20px is 4 * 10 = 40px wide.
        let (label, x, y) = footer.placement(1000, 80.0);
        assert_eq!(label, "3/10");
        assert_eq!(x, 480.0);
        assert_eq!(y, 960.0);

        let right_margin = 1000.0 - (x + BlockFace.measure(&label, 20.0));
        assert_eq!(x, right_margin);
    }

    #[test]
    fn footer_paints_near_bottom() {
        let mut ctx = RenderContext::new(200).unwrap();
        let footer = FooterLayer {
            index: 0,
            total: 3,
            typeface: &BlockFace,
            font_size: 10.0,
            color: Rgba([10, 20, 30, 255]),
        };
        footer.paint(&mut ctx).unwrap();

        // Padding 16: label top at 192, 8px tall, 3 glyphs of 4px centered on 100.
        assert_eq!(ctx.image.get_pixel(95, 195).0, [10, 20, 30, 255]);
        assert_eq!(ctx.image.get_pixel(100, 100).0, [0, 0, 0, 0]);
    }
}
