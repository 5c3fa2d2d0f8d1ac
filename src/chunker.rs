//! Splitting long text into post-sized chunks.
//!
//! The chunker packs paragraphs greedily into chunks of roughly
//! `max_chars` characters. A paragraph that does not fit on its own is
//! broken at word boundaries; a single word longer than the bound is
//! passed through as its own oversized chunk.
//!
//! The bound is soft in paragraph mode: the fit check compares the pending
//! chunk plus the next paragraph against `max_chars`, and the blank line
//! joining them is not counted. Paragraph lengths include their own leading
//! and trailing whitespace. Lengths are counted in `char`s, not bytes.
//!
//! # Example
//!
//! ```
//! use carousel_renderer::split_text_into_chunks;
//!
//! let text = "First paragraph.\n\nSecond paragraph.";
//! let chunks = split_text_into_chunks(text, 20, true);
//! assert_eq!(chunks, vec!["First paragraph.", "Second paragraph."]);
//! ```

use serde::{Deserialize, Serialize};

/// Default chunk bound, sized for a single caption-length post.
pub const DEFAULT_MAX_CHARS: usize = 280;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

// ============================================================================
// Chunk
// ============================================================================

/// A chunk of text paired with its position in the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position of the chunk.
    pub index: usize,
    /// The chunk text.
    pub text: String,
}

/// Pairs each chunk with its 0-based index.
pub fn into_chunks(texts: Vec<String>) -> Vec<Chunk> {
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk { index, text })
        .collect()
}

// ============================================================================
// ChunkOptions
// ============================================================================

/// Serializable chunking settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkOptions {
    /// Upper bound on chunk length in characters.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Keep paragraphs intact where possible.
    #[serde(default = "default_true")]
    pub preserve_paragraphs: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            preserve_paragraphs: true,
        }
    }
}

impl ChunkOptions {
    /// Creates options with the given bound and paragraph preservation on.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            ..Self::default()
        }
    }

    /// Sets whether paragraphs are preserved.
    pub fn with_preserve_paragraphs(mut self, preserve: bool) -> Self {
        self.preserve_paragraphs = preserve;
        self
    }

    /// Splits `text` with these options.
    pub fn split(&self, text: &str) -> Vec<String> {
        split_text_into_chunks(text, self.max_chars, self.preserve_paragraphs)
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Splitting
// ============================================================================

/// Splits `text` into an ordered list of chunks of about `max_chars`
/// characters.
///
/// With `preserve_paragraphs`, paragraphs (separated by blank lines) are
/// packed whole and joined by a blank line inside a chunk; each join may
/// push a chunk two characters past the bound. Without it, the
/// text is packed word by word and paragraph breaks are dropped.
///
/// Empty or whitespace-only input yields an empty list. No chunk is ever
/// empty, and no word is ever split.
pub fn split_text_into_chunks(
    text: &str,
    max_chars: usize,
    preserve_paragraphs: bool,
) -> Vec<String> {
    let chunks = if preserve_paragraphs {
        split_paragraphs(text, max_chars)
    } else {
        let mut chunks = Vec::new();
        pack_words(text, max_chars, &mut chunks);
        chunks
    };

    log::debug!(
        "Split {} chars into {} chunks (max {}, preserve paragraphs: {})",
        text.chars().count(),
        chunks.len(),
        max_chars,
        preserve_paragraphs
    );
    chunks
}

fn split_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in paragraphs(text) {
        let paragraph_len = paragraph.chars().count();

        if current_len > 0 && current_len + paragraph_len > max_chars {
            flush(&mut chunks, &current);
            current.clear();
            current.push_str(&paragraph);
            current_len = paragraph_len;
        } else {
            if current_len > 0 {
                current.push_str(PARAGRAPH_SEPARATOR);
                current_len += PARAGRAPH_SEPARATOR.len();
            }
            current.push_str(&paragraph);
            current_len += paragraph_len;
        }

        // An oversized paragraph replaces whatever was just accumulated for it.
        if paragraph_len > max_chars {
            pack_words(&paragraph, max_chars, &mut chunks);
            current.clear();
            current_len = 0;
        }
    }

    flush(&mut chunks, &current);
    chunks
}

/// Greedily packs whitespace-separated words into chunks joined by single
/// spaces, appending every finished chunk to `chunks`.
fn pack_words(text: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            flush(chunks, &current);
            current.clear();
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    flush(chunks, &current);
}

/// Pushes the trimmed chunk if anything is left after trimming.
fn flush(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Splits text into paragraphs on blank lines (lines holding only whitespace).
///
/// Paragraph-internal line breaks and surrounding indentation are kept;
/// blank runs are discarded. Chunks are trimmed only when flushed.
fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !lines.is_empty() {
                paragraphs.push(lines.join("\n"));
                lines.clear();
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        paragraphs.push(lines.join("\n"));
    }

    paragraphs
}

// ============================================================================
// Estimation
// ============================================================================

/// Rough estimate of how many characters fit on a slide.
///
/// Assumes an average glyph width of `0.6 * font_size` and a line height of
/// `1.5 * font_size` inside a box inset by `padding` on every side. Returns 0
/// when the font size is not positive or the padding swallows the box.
pub fn estimate_max_chars_per_post(
    font_size: f32,
    width: f32,
    height: f32,
    padding: f32,
) -> usize {
    if font_size <= 0.0 {
        return 0;
    }

    let available_width = (width - padding * 2.0).max(0.0);
    let available_height = (height - padding * 2.0).max(0.0);

    let chars_per_line = (available_width / (font_size * 0.6)).floor() as usize;
    let max_lines = (available_height / (font_size * 1.5)).floor() as usize;

    chars_per_line * max_lines
}

// ============================================================================
// Tests
// ============================================================================
