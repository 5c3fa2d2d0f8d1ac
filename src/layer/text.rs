//! Word-wrapped body text.

use image::Rgba;

use super::{Layer, RenderContext};
use crate::error::Result;
use crate::font::Typeface;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.5;

/// A laid-out line and the y coordinate of its top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
}

/// Result of laying out a chunk, emitted into the [`RenderContext`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    /// The lines that were drawn, top to bottom.
    pub lines: Vec<PlacedLine>,
    /// True when trailing words were dropped for lack of vertical room.
    pub truncated: bool,
}

/// Greedily wraps whitespace-separated words into lines no wider than
/// `max_width`, as measured by `measure`.
///
/// Lines start at `top` and advance by `line_height`. Once the cursor moves
/// past `cutoff` no further words are taken; the line holding the word that
/// overflowed is still emitted, and any words after it are dropped. A single
/// word wider than `max_width` gets a line of its own.
pub fn wrap_words<M>(
    text: &str,
    max_width: f32,
    line_height: f32,
    top: f32,
    cutoff: f32,
    measure: M,
) -> LayoutReport
where
    M: Fn(&str) -> f32,
{
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut report = LayoutReport::default();
    let mut line = String::new();
    let mut y = top;

    for (i, word) in words.iter().enumerate() {
        let candidate = if line.is_empty() {
            (*word).to_string()
        } else {
            format!("{line} {word}")
        };

        if !line.is_empty() && measure(&candidate) > max_width {
            let finished = std::mem::replace(&mut line, (*word).to_string());
            report.lines.push(PlacedLine { text: finished, y });
            y += line_height;

            if y > cutoff {
                report.truncated = i + 1 < words.len();
                break;
            }
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        report.lines.push(PlacedLine { text: line, y });
    }

    report
}

/// Paints a chunk of text inside the slide padding.
///
/// Emits a [`LayoutReport`] describing the lines drawn.
pub struct TextLayer<'a, F: Typeface> {
    pub text: &'a str,
    pub typeface: &'a F,
    pub font_size: f32,
    pub color: Rgba<u8>,
    /// Space kept free above the bottom padding, in pixels.
    pub reserved_bottom: f32,
}

impl<F: Typeface> Layer for TextLayer<'_, F> {
    fn paint(&self, ctx: &mut RenderContext) -> Result<()> {
        let geometry = ctx.geometry;
        let cutoff = geometry.size as f32 - geometry.padding - self.reserved_bottom;

        let report = wrap_words(
            self.text,
            geometry.text_width(),
            self.font_size * LINE_HEIGHT_RATIO,
            geometry.padding,
            cutoff,
            |line| self.typeface.measure(line, self.font_size),
        );

        for line in &report.lines {
            self.typeface.draw(
                &mut ctx.image,
                &line.text,
                geometry.padding,
                line.y,
                self.font_size,
                self.color,
            );
        }

        ctx.set(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::BlockFace;
    use crate::layer::{BackgroundLayer, SlideGeometry};
    use crate::style::{Background, WHITE};

    /// One unit of width per character.
    fn chars(line: &str) -> f32 {
        line.chars().count() as f32
    }

    fn texts(report: &LayoutReport) -> Vec<&str> {
        report.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn short_text_is_one_line() {
        let report = wrap_words("hello world", 100.0, 10.0, 0.0, 1000.0, chars);
        assert_eq!(texts(&report), vec!["hello world"]);
        assert_eq!(report.lines[0].y, 0.0);
        assert!(!report.truncated);
    }

    #[test]
    fn wraps_when_measured_width_exceeds_budget() {
        let report = wrap_words("aa bb cc dd", 5.0, 10.0, 2.0, 1000.0, chars);
        assert_eq!(texts(&report), vec!["aa bb", "cc dd"]);
        assert_eq!(report.lines[1].y, 12.0);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let report = wrap_words("a supercalifragilistic b", 5.0, 10.0, 0.0, 1000.0, chars);
        assert_eq!(texts(&report), vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn newlines_and_runs_of_spaces_collapse() {
        let report = wrap_words("one\n\ntwo   three", 100.0, 10.0, 0.0, 1000.0, chars);
        assert_eq!(texts(&report), vec!["one two three"]);
    }

    #[test]
    fn empty_text_lays_out_nothing() {
        let report = wrap_words("   ", 100.0, 10.0, 0.0, 1000.0, chars);
        assert!(report.lines.is_empty());
        assert!(!report.truncated);
    }

    #[test]
    fn cutoff_drops_remaining_words() {
        // Lines at y = 0, 10, 20; moving to 30 crosses the cutoff of 25.
        let report = wrap_words("a b c d e f", 1.0, 10.0, 0.0, 25.0, chars);
        assert_eq!(texts(&report), vec!["a", "b", "c", "d"]);
        assert_eq!(report.lines[3].y, 30.0);
        assert!(report.truncated);
    }

    #[test]
    fn cutoff_on_last_word_is_not_truncation() {
        let report = wrap_words("a b c d", 1.0, 10.0, 0.0, 25.0, chars);
        assert_eq!(texts(&report), vec!["a", "b", "c", "d"]);
        assert!(!report.truncated);
    }

    #[test]
    fn layer_draws_inside_padding_and_emits_report() {
        let mut ctx = RenderContext::new(100).unwrap();
        BackgroundLayer::new(Background::Solid(WHITE)).paint(&mut ctx).unwrap();

        let layer = TextLayer {
            text: "hi",
            typeface: &BlockFace,
            font_size: 10.0,
            color: Rgba([0, 0, 0, 255]),
            reserved_bottom: 0.0,
        };
        layer.paint(&mut ctx).unwrap();

        let geometry = SlideGeometry::new(100);
        let report = ctx.get::<LayoutReport>().unwrap();
        assert_eq!(texts(report), vec!["hi"]);
        assert_eq!(report.lines[0].y, geometry.padding);

        // Padding is 8px; the first block covers x 8..13, y 8..18.
        assert_eq!(ctx.image.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(ctx.image.get_pixel(2, 2).0, [255, 255, 255, 255]);
    }
}
