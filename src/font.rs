//! Font lookup, text measurement and glyph rasterization.
//!
//! The layout code only talks to the [`Typeface`] trait: it needs the
//! advance width of a run of text and a way to paint that run onto an
//! image. [`FontFace`] implements it on top of `ab_glyph`; [`FontBook`]
//! resolves CSS-style family lists to faces through the `fontdb` database
//! bundled with resvg.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use resvg::usvg::fontdb::{self, Database, Family, Query};

use crate::error::{RenderError, Result};

// ============================================================================
// Typeface
// ============================================================================

/// Something that can measure and draw a single line of text.
///
/// Sizes are CSS pixels: `px` is the em size, as in `font: 24px serif`.
pub trait Typeface {
    /// Returns the advance width of `text` at `px`, including kerning.
    fn measure(&self, text: &str, px: f32) -> f32;

    /// Draws `text` with the top of its em box at `top` and its left edge
    /// at `x`, blending `color` over the existing pixels.
    fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        x: f32,
        top: f32,
        px: f32,
        color: Rgba<u8>,
    );
}

impl<T: Typeface + ?Sized> Typeface for &T {
    fn measure(&self, text: &str, px: f32) -> f32 {
        (**self).measure(text, px)
    }

    fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        x: f32,
        top: f32,
        px: f32,
        color: Rgba<u8>,
    ) {
        (**self).draw(image, text, x, top, px, color)
    }
}

// ============================================================================
// FontFace
// ============================================================================

/// A parsed font face backed by `ab_glyph`.
pub struct FontFace {
    font: FontVec,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontFace {
    /// Parses a face from raw TrueType/OpenType data.
    ///
    /// `index` selects the face within a collection; use 0 for plain fonts.
    pub fn from_data(data: Vec<u8>, index: u32) -> Result<Self> {
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| RenderError::FontLoad(e.to_string()))?;
        Ok(Self { font })
    }

    /// Converts a CSS em size to the `ab_glyph` scale, which is measured
    /// from ascent to descent rather than per em.
    fn scale(&self, px: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(px * self.font.height_unscaled() / units_per_em)
    }
}

impl Typeface for FontFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(self.scale(px));
        let mut width = 0.0;
        let mut previous = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        width
    }

    fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        x: f32,
        top: f32,
        px: f32,
        color: Rgba<u8>,
    ) {
        let scale = self.scale(px);
        let scaled = self.font.as_scaled(scale);
        let baseline = top + scaled.ascent();
        let mut caret = x;
        let mut previous = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }

            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let ix = bounds.min.x as i32 + gx as i32;
                    let iy = bounds.min.y as i32 + gy as i32;
                    blend_coverage(image, ix, iy, color, coverage);
                });
            }

            caret += scaled.h_advance(id);
            previous = Some(id);
        }
    }
}

// ============================================================================
// Blending
// ============================================================================

/// Blends `color` at `coverage` (0.0-1.0) over the pixel at (`x`, `y`).
///
/// Out-of-bounds coordinates are ignored.
pub(crate) fn blend_coverage(
    image: &mut RgbaImage,
    x: i32,
    y: i32,
    color: Rgba<u8>,
    coverage: f32,
) {
    if x < 0 || y < 0 || x >= image.width() as i32 || y >= image.height() as i32 {
        return;
    }

    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }

    let alpha = (color[3] as f32 * coverage).round() as u8;
    let src = Rgba([color[0], color[1], color[2], alpha]);
    let dst = image.get_pixel(x as u32, y as u32);
    let blended = alpha_blend(src, *dst);
    image.put_pixel(x as u32, y as u32, blended);
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// FontBook
// ============================================================================

/// A database of font faces that can resolve CSS font-family lists.
pub struct FontBook {
    db: Database,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Creates an empty font book.
    pub fn new() -> Self {
        Self { db: Database::new() }
    }

    /// Creates a font book populated with the fonts installed on the system.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces", db.len());
        Self { db }
    }

    /// Adds every face found in a font file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.db.load_font_file(path.as_ref())?;
        Ok(())
    }

    /// Adds every face found in an in-memory font blob.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Returns the number of loaded faces.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Returns true if no faces are loaded.
    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }

    /// Resolves a CSS font-family list such as `"Playfair Display, serif"`.
    ///
    /// Families are tried in order, then the generic sans-serif family, then
    /// any loaded face at all. Fails only when the book has no usable face.
    pub fn resolve(&self, family_list: &str) -> Result<FontFace> {
        let names = parse_family_list(family_list);
        let mut families: Vec<Family<'_>> = names.iter().map(|name| to_family(name)).collect();
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };

        let id = match self.db.query(&query) {
            Some(id) => id,
            None => {
                let fallback = self.db.faces().next().ok_or_else(|| RenderError::FontNotFound {
                    family: family_list.to_string(),
                })?;
                log::warn!(
                    "No face matches '{}', falling back to '{}'",
                    family_list,
                    fallback
                        .families
                        .first()
                        .map(|(name, _)| name.as_str())
                        .unwrap_or("unnamed")
                );
                fallback.id
            }
        };

        self.db
            .with_face_data(id, |data, index| FontFace::from_data(data.to_vec(), index))
            .ok_or_else(|| RenderError::FontNotFound {
                family: family_list.to_string(),
            })?
    }
}

/// Splits a CSS font-family list into unquoted names.
fn parse_family_list(family_list: &str) -> Vec<String> {
    family_list
        .split(',')
        .map(|name| name.trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" => Family::SansSerif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

// ============================================================================
// Test Support
// ============================================================================

/// Deterministic stand-in typeface that does not depend on installed fonts.
///
/// Every character advances by half the em size; non-space characters are
/// painted as solid blocks filling the advance box.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub(crate) struct BlockFace;

    impl BlockFace {
        pub(crate) const ADVANCE: f32 = 0.5;
    }

    impl Typeface for BlockFace {
        fn measure(&self, text: &str, px: f32) -> f32 {
            text.chars().count() as f32 * px * Self::ADVANCE
        }

        fn draw(
            &self,
            image: &mut RgbaImage,
            text: &str,
            x: f32,
            top: f32,
            px: f32,
            color: Rgba<u8>,
        ) {
            let advance = px * Self::ADVANCE;
            for (i, c) in text.chars().enumerate() {
                if c.is_whitespace() {
                    continue;
                }
                let left = (x + i as f32 * advance).round() as i32;
                let right = (x + (i + 1) as f32 * advance).round() as i32;
                for iy in top.round() as i32..(top + px).round() as i32 {
                    for ix in left..right {
                        blend_coverage(image, ix, iy, color, 1.0);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::testing::BlockFace;
    use super::*;

    #[test]
    fn family_list_parsing() {
        assert_eq!(
            parse_family_list("\"Playfair Display\", 'Georgia' , serif,"),
            vec!["Playfair Display", "Georgia", "serif"]
        );
        assert!(parse_family_list("  ").is_empty());
    }

    #[test]
    fn generic_families_map_to_fontdb_generics() {
        assert_eq!(to_family("serif"), Family::Serif);
        assert_eq!(to_family("Sans-Serif"), Family::SansSerif);
        assert_eq!(to_family("monospace"), Family::Monospace);
        assert_eq!(to_family("Inter"), Family::Name("Inter"));
    }

    #[test]
    fn empty_book_reports_missing_font() {
        let book = FontBook::new();
        assert!(book.is_empty());
        let err = book.resolve("Inter, sans-serif").unwrap_err();
        assert!(matches!(err, RenderError::FontNotFound { .. }));
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        let err = FontFace::from_data(vec![0u8; 16], 0).unwrap_err();
        assert!(matches!(err, RenderError::FontLoad(_)));
    }

    #[test]
    fn system_font_measures_monotonically() {
        let book = FontBook::system();
        let Ok(face) = book.resolve("sans-serif") else {
            // No fonts installed on this machine.
            return;
        };
        let short = face.measure("Hello", 24.0);
        let long = face.measure("Hello world", 24.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!(face.measure("Hello", 48.0) > short);
    }

    #[test]
    fn block_face_paints_opaque_blocks() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        BlockFace.draw(&mut image, "a b", 0.0, 0.0, 10.0, Rgba([0, 0, 0, 255]));

        assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0, 255]);
        // The space between the blocks stays untouched.
        assert_eq!(image.get_pixel(7, 2).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(12, 2).0, [0, 0, 0, 255]);
        assert_eq!(BlockFace.measure("a b", 10.0), 15.0);
    }

    #[test]
    fn blend_coverage_mixes_colors() {
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        blend_coverage(&mut image, 0, 0, Rgba([0, 0, 255, 255]), 0.5);
        let pixel = image.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should keep some red");
        assert!(pixel[2] > 0, "Should gain some blue");
        assert_eq!(pixel[3], 255);

        // Outside the image is a no-op.
        blend_coverage(&mut image, -1, 5, Rgba([0, 0, 0, 255]), 1.0);
    }
}
