//! Error types for chunk rendering.

use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while turning chunks into slides.
///
/// Degenerate input (empty text, oversized words, unknown gradient names) is
/// never an error; it is handled by fallback behavior in the chunker and the
/// paint layers.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The raster surface could not be allocated.
    #[error("Drawing surface unavailable for a {size}x{size} canvas")]
    SurfaceUnavailable { size: u32 },

    /// A page index outside `0..total`.
    #[error("Page index {index} is out of range for {total} pages")]
    InvalidPage { index: usize, total: usize },

    /// No installed face matches the requested family list.
    #[error("No font found for family list '{family}'")]
    FontNotFound { family: String },

    /// A font blob could not be parsed.
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// A color string could not be parsed.
    #[error("Invalid color value: '{0}'")]
    InvalidColor(String),

    /// PNG encoding failed.
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing an exported slide failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A batch render failed on one chunk.
    #[error("Rendering slide {} failed: {source}", .index + 1)]
    Batch {
        index: usize,
        #[source]
        source: Box<RenderError>,
    },
}

impl RenderError {
    /// Wraps an error with the 0-based index of the chunk that produced it.
    pub fn at_index(self, index: usize) -> Self {
        Self::Batch {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the failing chunk index for batch errors.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Batch { index, .. } => Some(*index),
            _ => None,
        }
    }
}
