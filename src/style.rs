//! Serializable slide style and color resolution.
//!
//! A [`StyleConfig`] captures the background, font and text color applied
//! uniformly to every slide of a carousel. It serializes to the same JSON
//! shape the editing frontend uses:
//!
//! ```json
//! {
//!   "background": "gradient-blue-purple",
//!   "fontFamily": "Playfair Display, serif",
//!   "fontSize": 24.0,
//!   "textColor": "#000000"
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use carousel_renderer::{Background, StyleConfig};
//!
//! let json = r##"{ "background": "#000000", "fontSize": "28px" }"##;
//! let style = StyleConfig::from_json(json).unwrap();
//! assert_eq!(style.font_size, 28.0);
//! assert!(matches!(style.resolve_background().unwrap(), Background::Solid(_)));
//! ```

use std::str::FromStr;

use image::Rgba;
use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RenderError, Result};

// ============================================================================
// Gradient Presets
// ============================================================================

/// A named two-stop diagonal gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientPreset {
    /// Preset name, without the `gradient-` prefix.
    pub name: &'static str,
    /// Color at the top-left corner.
    pub start: Rgba<u8>,
    /// Color at the bottom-right corner.
    pub end: Rgba<u8>,
}

const fn opaque(hex: u32) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255])
}

/// The built-in gradient palette.
pub static GRADIENT_PRESETS: [GradientPreset; 4] = [
    GradientPreset {
        name: "blue-purple",
        start: opaque(0xE5DEFF),
        end: opaque(0xD3E4FD),
    },
    GradientPreset {
        name: "peach-cream",
        start: opaque(0xFDE1D3),
        end: opaque(0xFEF7CD),
    },
    GradientPreset {
        name: "green-blue",
        start: opaque(0xF2FCE2),
        end: opaque(0xD3E4FD),
    },
    GradientPreset {
        name: "pink-purple",
        start: opaque(0xFFDEE2),
        end: opaque(0xE5DEFF),
    },
];

const GRADIENT_PREFIX: &str = "gradient-";

/// Opaque white, used when a gradient name is not recognized.
pub const WHITE: Rgba<u8> = opaque(0xFFFFFF);

impl GradientPreset {
    /// Looks up a preset by name, with or without the `gradient-` prefix.
    pub fn find(name: &str) -> Option<&'static GradientPreset> {
        let name = name.strip_prefix(GRADIENT_PREFIX).unwrap_or(name);
        GRADIENT_PRESETS.iter().find(|preset| preset.name == name)
    }
}

// ============================================================================
// Background
// ============================================================================

/// A resolved slide background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Diagonal gradient from the top-left to the bottom-right corner.
    Gradient(&'static GradientPreset),
    /// Uniform fill.
    Solid(Rgba<u8>),
}

impl Background {
    /// Resolves a background string.
    ///
    /// Preset names resolve to gradients. Any other value mentioning
    /// `gradient` is an unknown preset and falls back to white. Everything
    /// else is parsed as a solid color.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        if let Some(preset) = GradientPreset::find(value) {
            return Ok(Self::Gradient(preset));
        }

        if value.contains("gradient") {
            log::warn!("Unknown gradient '{}', falling back to white", value);
            return Ok(Self::Solid(WHITE));
        }

        parse_color(value).map(Self::Solid)
    }
}

// ============================================================================
// Color Parsing
// ============================================================================

/// Parses a CSS color value.
///
/// Opaque `#rgb`/`#rrggbb` and named colors go through `palette`; alpha hex
/// forms, `transparent` and the `rgb()`/`rgba()`/`hsl()`/`hsla()` functions
/// go through the SVG color parser.
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let trimmed = value.trim();

    let opaque = if trimmed.starts_with('#') {
        Srgb::<u8>::from_str(trimmed).ok()
    } else {
        palette::named::from_str(&trimmed.to_ascii_lowercase())
    };
    if let Some(c) = opaque {
        return Ok(Rgba([c.red, c.green, c.blue, 255]));
    }

    svgtypes::Color::from_str(trimmed)
        .map(|c| Rgba([c.red, c.green, c.blue, c.alpha]))
        .map_err(|_| RenderError::InvalidColor(value.to_string()))
}

// ============================================================================
// StyleConfig
// ============================================================================

/// Style applied to every slide in a render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Gradient preset name (e.g. `gradient-peach-cream`) or a solid color.
    pub background: String,

    /// CSS font-family list, e.g. `"Georgia, serif"`.
    pub font_family: String,

    /// Font size in pixels. Accepts `24` or `"24px"` when deserializing.
    #[serde(deserialize_with = "deserialize_font_size")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "f32"))]
    pub font_size: f32,

    /// Text color, e.g. `#333333`.
    pub text_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: "gradient-blue-purple".into(),
            font_family: "Playfair Display, serif".into(),
            font_size: 24.0,
            text_color: "#000000".into(),
        }
    }
}

impl StyleConfig {
    /// Creates the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Sets the font family list.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Sets the font size in pixels.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Sets the text color.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Resolves the background string.
    pub fn resolve_background(&self) -> Result<Background> {
        Background::parse(&self.background)
    }

    /// Resolves the text color string.
    pub fn resolve_text_color(&self) -> Result<Rgba<u8>> {
        parse_color(&self.text_color)
    }

    /// Serializes the style to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the style to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a style from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FontSizeRepr {
    Number(f32),
    Css(String),
}

fn deserialize_font_size<'de, D>(deserializer: D) -> std::result::Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match FontSizeRepr::deserialize(deserializer)? {
        FontSizeRepr::Number(size) => Ok(size),
        FontSizeRepr::Css(css) => {
            let trimmed = css.trim();
            let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
            number
                .parse::<f32>()
                .map_err(|_| D::Error::custom(format!("invalid font size '{css}'")))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_presets_resolve_with_or_without_prefix() {
        let bg = Background::parse("gradient-peach-cream").unwrap();
        let Background::Gradient(preset) = bg else {
            panic!("expected gradient, got {bg:?}");
        };
        assert_eq!(preset.start, Rgba([0xFD, 0xE1, 0xD3, 255]));
        assert_eq!(preset.end, Rgba([0xFE, 0xF7, 0xCD, 255]));

        assert_eq!(
            Background::parse("pink-purple").unwrap(),
            Background::parse("gradient-pink-purple").unwrap()
        );
    }

    #[test]
    fn unknown_gradient_falls_back_to_white() {
        assert_eq!(Background::parse("gradient-sunset").unwrap(), Background::Solid(WHITE));
    }

    #[test]
    fn solid_colors_are_used_verbatim() {
        let solid = |value| Background::parse(value).unwrap();
        assert_eq!(solid("#000000"), Background::Solid(Rgba([0, 0, 0, 255])));
        assert_eq!(solid("#6E59A5"), Background::Solid(Rgba([0x6E, 0x59, 0xA5, 255])));
        assert_eq!(solid("#fff"), Background::Solid(WHITE));
        assert_eq!(solid("Red"), Background::Solid(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn functional_and_alpha_colors_are_used_verbatim() {
        let solid = |value| Background::parse(value).unwrap();
        assert_eq!(solid("rgb(255, 0, 0)"), Background::Solid(Rgba([255, 0, 0, 255])));
        assert_eq!(solid("#FF000080"), Background::Solid(Rgba([255, 0, 0, 0x80])));
        assert_eq!(solid("hsl(60, 100%, 50%)"), Background::Solid(Rgba([255, 255, 0, 255])));
        assert_eq!(solid("transparent"), Background::Solid(Rgba([0, 0, 0, 0])));

        assert_eq!(parse_color("rgba(10, 20, 30, 0.5)").unwrap(), Rgba([10, 20, 30, 128]));
        assert_eq!(parse_color("#f008").unwrap(), Rgba([255, 0, 0, 0x88]));

        let Background::Solid(red) = solid("hsl(0, 100%, 50%)") else {
            panic!("expected a solid color");
        };
        assert!(red[0] >= 254 && red[1] <= 1 && red[2] <= 1 && red[3] == 255);
    }

    #[test]
    fn invalid_colors_are_rejected() {
        assert!(matches!(parse_color("#12"), Err(RenderError::InvalidColor(_))));
        assert!(matches!(parse_color("bad"), Err(RenderError::InvalidColor(_))));
        assert!(matches!(Background::parse("not-a-color"), Err(RenderError::InvalidColor(_))));
        assert!(matches!(parse_color("rgb(1, 2)"), Err(RenderError::InvalidColor(_))));
    }

    #[test]
    fn style_json_round_trip() {
        let style = StyleConfig::new()
            .with_background("gradient-green-blue")
            .with_font_family("Georgia, serif")
            .with_font_size(20.0)
            .with_text_color("#1EAEDB");

        let json = style.to_json().unwrap();
        assert!(json.contains("\"fontFamily\""));
        assert!(json.contains("\"textColor\""));

        let restored = StyleConfig::from_json(&json).unwrap();
        assert_eq!(restored, style);
    }

    #[test]
    fn font_size_accepts_css_px_strings() {
        let style = StyleConfig::from_json(r#"{ "fontSize": "18px" }"#).unwrap();
        assert_eq!(style.font_size, 18.0);

        let style = StyleConfig::from_json(r#"{ "fontSize": 30 }"#).unwrap();
        assert_eq!(style.font_size, 30.0);

        assert!(StyleConfig::from_json(r#"{ "fontSize": "large" }"#).is_err());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let style = StyleConfig::from_json("{}").unwrap();
        assert_eq!(style, StyleConfig::default());
        assert_eq!(style.resolve_text_color().unwrap(), Rgba([0, 0, 0, 255]));
    }
}
