//! Slide rendering engine.
//!
//! [`SlideRenderer`] turns one chunk of text into one square slide. Every
//! call is independent: the renderer holds no per-slide state, so a batch
//! is just a sequence of renders with explicit `index` and `total`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::font::Typeface;
use crate::layer::footer::FOOTER_RESERVE;
use crate::layer::{BackgroundLayer, FooterLayer, Layer, LayoutReport, RenderContext, TextLayer};
use crate::style::StyleConfig;

/// Default slide side length in pixels.
pub const DEFAULT_SIZE: u32 = 1080;

// ============================================================================
// RenderOptions
// ============================================================================

/// How the page-number footer is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FooterMode {
    /// Draw the footer and keep body text clear of it.
    #[default]
    Reserved,
    /// Draw no footer; body text may run down to the bottom padding.
    Hidden,
}

/// Per-renderer settings shared by every slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Side length of the square slide in pixels.
    pub size: u32,
    /// Footer handling.
    pub footer: FooterMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            footer: FooterMode::Reserved,
        }
    }
}

impl RenderOptions {
    /// Creates options for a `size x size` slide with a reserved footer.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Sets the footer mode.
    pub fn with_footer(mut self, footer: FooterMode) -> Self {
        self.footer = footer;
        self
    }

    fn reserved_bottom(&self) -> f32 {
        match self.footer {
            FooterMode::Reserved => FOOTER_RESERVE,
            FooterMode::Hidden => 0.0,
        }
    }
}

// ============================================================================
// RenderedImage
// ============================================================================

/// A finished slide.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    /// 0-based position in the carousel.
    pub index: usize,
    /// Number of slides in the carousel.
    pub total: usize,
    /// The raster output.
    pub image: RgbaImage,
    /// True if body text did not fit and trailing words were dropped.
    pub truncated: bool,
}

impl RenderedImage {
    /// Encodes the slide as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Encodes the slide as a self-contained `data:image/png;base64,` URI.
    pub fn to_data_uri(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }

    /// Download file name, 1-based: `instagram-post-1.png`.
    pub fn file_name(&self) -> String {
        format!("instagram-post-{}.png", self.index + 1)
    }

    /// Writes the PNG into `dir` under [`file_name`](Self::file_name).
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        std::fs::write(&path, self.to_png()?)?;
        Ok(path)
    }
}

/// Writes every slide into `dir`, creating it if needed.
///
/// Returns the written paths in slide order.
pub fn export_all(images: &[RenderedImage], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    images
        .iter()
        .map(|image| image.save_to(dir).map_err(|e| e.at_index(image.index)))
        .collect()
}

// ============================================================================
// SlideRenderer
// ============================================================================

/// Renders text chunks onto square slides.
///
/// # Example
///
/// ```no_run
/// use carousel_renderer::{FontBook, RenderOptions, SlideRenderer, StyleConfig};
///
/// let style = StyleConfig::default();
/// let face = FontBook::system().resolve(&style.font_family)?;
/// let renderer = SlideRenderer::new(face, RenderOptions::default());
///
/// let chunks = vec!["First slide.".to_string(), "Second slide.".to_string()];
/// let slides = renderer.generate_images(&chunks, &style)?;
/// assert_eq!(slides.len(), 2);
/// # Ok::<(), carousel_renderer::RenderError>(())
/// ```
pub struct SlideRenderer<F: Typeface> {
    typeface: F,
    options: RenderOptions,
}

impl<F: Typeface> SlideRenderer<F> {
    /// Creates a renderer drawing with `typeface`.
    pub fn new(typeface: F, options: RenderOptions) -> Self {
        Self { typeface, options }
    }

    /// Returns the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Returns the typeface used for body and footer text.
    pub fn typeface(&self) -> &F {
        &self.typeface
    }

    /// Renders one slide.
    ///
    /// `index` is 0-based and must be below `total`. Text that does not fit
    /// is dropped and flagged through [`RenderedImage::truncated`].
    pub fn render(
        &self,
        text: &str,
        style: &StyleConfig,
        index: usize,
        total: usize,
    ) -> Result<RenderedImage> {
        if index >= total {
            return Err(RenderError::InvalidPage { index, total });
        }

        let background = style.resolve_background()?;
        let color = style.resolve_text_color()?;
        let mut ctx = RenderContext::new(self.options.size)?;

        BackgroundLayer::new(background).paint(&mut ctx)?;

        TextLayer {
            text,
            typeface: &self.typeface,
            font_size: style.font_size,
            color,
            reserved_bottom: self.options.reserved_bottom(),
        }
        .paint(&mut ctx)?;

        if self.options.footer == FooterMode::Reserved {
            FooterLayer {
                index,
                total,
                typeface: &self.typeface,
                font_size: style.font_size,
                color,
            }
            .paint(&mut ctx)?;
        }

        let truncated = ctx.get::<LayoutReport>().is_some_and(|report| report.truncated);
        if truncated {
            log::warn!(
                "Slide {}/{} overflows a {}px canvas; trailing text was dropped",
                index + 1,
                total,
                self.options.size
            );
        }

        log::debug!(
            "Rendered slide {}/{} ({} chars)",
            index + 1,
            total,
            text.chars().count()
        );

        Ok(RenderedImage {
            index,
            total,
            image: ctx.image,
            truncated,
        })
    }

    /// Renders one slide and returns it as a PNG data URI.
    ///
    /// Takes the same `index` and `total` as [`render`](Self::render); the
    /// footer follows [`RenderOptions::footer`], so a renderer built with
    /// [`FooterMode::Hidden`] produces a bare slide.
    pub fn text_to_image(
        &self,
        text: &str,
        style: &StyleConfig,
        index: usize,
        total: usize,
    ) -> Result<String> {
        self.render(text, style, index, total)?.to_data_uri()
    }

    /// Renders every chunk in order.
    ///
    /// Stops at the first failure, reporting the failing index through
    /// [`RenderError::Batch`].
    pub fn generate_images<S: AsRef<str>>(
        &self,
        chunks: &[S],
        style: &StyleConfig,
    ) -> Result<Vec<RenderedImage>> {
        let total = chunks.len();

        chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                self.render(chunk.as_ref(), style, index, total)
                    .map_err(|e| e.at_index(index))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
