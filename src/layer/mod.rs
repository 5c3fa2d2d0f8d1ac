//! Paint layers for slide rendering.
//!
//! A slide is painted by running a fixed sequence of layers over a shared
//! [`RenderContext`]:
//!
//! ```text
//! Empty surface (size x size)
//!     │
//!     ▼
//! ┌────────────┐
//! │ Background │ ◄── gradient preset or solid fill
//! └─────┬──────┘
//!       │
//!       ▼
//! ┌────────────┐
//! │    Text    │ ◄── greedy word wrap, emits LayoutReport
//! └─────┬──────┘
//!       │
//!       ▼
//! ┌────────────┐
//! │   Footer   │ ◄── "{n}/{total}", optional
//! └────────────┘
//! ```
//!
//! Layers communicate through typed properties on the context, so the
//! renderer can read what the text layer did without the layers knowing
//! about each other.

pub mod background;
pub mod footer;
pub mod text;

pub use background::BackgroundLayer;
pub use footer::FooterLayer;
pub use text::{LayoutReport, PlacedLine, TextLayer, wrap_words};

use std::any::{Any, TypeId};
use std::collections::HashMap;

use image::RgbaImage;

use crate::error::{RenderError, Result};

/// Largest canvas side accepted, matching common browser canvas limits.
pub const MAX_SURFACE_SIZE: u32 = 16_384;

/// Horizontal and vertical inset as a fraction of the canvas side.
pub const PADDING_RATIO: f32 = 0.08;

// ============================================================================
// Slide Geometry
// ============================================================================

/// Fixed measurements of a square slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGeometry {
    /// Side length in pixels.
    pub size: u32,
    /// Inset from every edge in pixels.
    pub padding: f32,
}

impl SlideGeometry {
    /// Creates the geometry for a `size x size` slide.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            padding: size as f32 * PADDING_RATIO,
        }
    }

    /// Width available to a line of text.
    pub fn text_width(&self) -> f32 {
        self.size as f32 - self.padding * 2.0
    }
}

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the paint layers.
///
/// Holds the drawing surface and a typed property bag that upstream layers
/// write and downstream consumers read.
pub struct RenderContext {
    /// The drawing surface.
    pub image: RgbaImage,

    /// Slide measurements shared by every layer.
    pub geometry: SlideGeometry,

    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    /// Allocates a transparent `size x size` surface.
    ///
    /// Fails with [`RenderError::SurfaceUnavailable`] for a zero or
    /// oversized canvas.
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 || size > MAX_SURFACE_SIZE {
            return Err(RenderError::SurfaceUnavailable { size });
        }

        Ok(Self {
            image: RgbaImage::new(size, size),
            geometry: SlideGeometry::new(size),
            properties: HashMap::new(),
        })
    }

    /// Sets a typed property that later consumers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an earlier layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    /// Checks if a property has been set.
    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// A single paint stage.
pub trait Layer {
    /// Paints onto `ctx.image`, optionally emitting properties.
    fn paint(&self, ctx: &mut RenderContext) -> Result<()>;
}
