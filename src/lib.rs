//! carousel-renderer: turn long-form text into square carousel slides
//!
//! This crate splits an essay into post-sized chunks and renders each chunk
//! onto a square image with a gradient or solid background, word-wrapped
//! text and a `n/total` page footer.
//!
//! # Example
//!
//! ```no_run
//! use carousel_renderer::{
//!     export_all, split_text_into_chunks, FontBook, RenderOptions, SlideRenderer, StyleConfig,
//! };
//!
//! let essay = std::fs::read_to_string("essay.txt")?;
//! let chunks = split_text_into_chunks(&essay, 300, true);
//!
//! let style = StyleConfig::new()
//!     .with_background("gradient-peach-cream")
//!     .with_font_family("Georgia, serif");
//!
//! let face = FontBook::system().resolve(&style.font_family)?;
//! let renderer = SlideRenderer::new(face, RenderOptions::default());
//!
//! let slides = renderer.generate_images(&chunks, &style)?;
//! export_all(&slides, "out")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Styles as JSON
//!
//! [`StyleConfig`] round-trips through the JSON shape used by the editing
//! frontend:
//!
//! ```
//! use carousel_renderer::StyleConfig;
//!
//! let style = StyleConfig::from_json(
//!     r##"{ "background": "gradient-green-blue", "fontSize": "24px", "textColor": "#333333" }"##,
//! )
//! .unwrap();
//! let json = style.to_json().unwrap();
//! assert_eq!(StyleConfig::from_json(&json).unwrap(), style);
//! ```

mod chunker;
mod error;
mod font;
mod layer;
mod renderer;
mod style;

pub use chunker::{
    Chunk, ChunkOptions, DEFAULT_MAX_CHARS, estimate_max_chars_per_post, into_chunks,
    split_text_into_chunks,
};
pub use error::{RenderError, Result};
pub use font::{FontBook, FontFace, Typeface};
pub use layer::footer::page_label;
pub use layer::{
    BackgroundLayer, FooterLayer, Layer, LayoutReport, PlacedLine, RenderContext, SlideGeometry,
    TextLayer, wrap_words,
};
pub use renderer::{
    DEFAULT_SIZE, FooterMode, RenderOptions, RenderedImage, SlideRenderer, export_all,
};
pub use style::{Background, GRADIENT_PRESETS, GradientPreset, StyleConfig, parse_color};
