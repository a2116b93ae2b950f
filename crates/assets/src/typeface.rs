use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::AssetError;
use crate::outline::{PathCommand, parse_outline};

/// Helvetiker regular, as published alongside three.js.
pub const DEFAULT_TYPEFACE_URL: &str =
    "https://threejs.org/examples/fonts/helvetiker_regular.typeface.json";

/// Font-space bounding box of the whole typeface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

/// One glyph entry: horizontal advance plus an outline command stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphData {
    pub ha: f32,
    #[serde(default)]
    pub x_min: f32,
    #[serde(default)]
    pub x_max: f32,
    /// Outline commands, e.g. `"m 10 0 l 10 700 q 300 700 150 800"`.
    #[serde(default)]
    pub o: String,
}

/// A typeface description in the three.js `typeface.json` layout.
///
/// Glyph coordinates are in font units; `resolution` font units make one em.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typeface {
    pub glyphs: BTreeMap<String, GlyphData>,
    #[serde(default)]
    pub family_name: String,
    pub resolution: f32,
    #[serde(default)]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
    #[serde(default)]
    pub ascender: f32,
    #[serde(default)]
    pub descender: f32,
}

/// Where a typeface comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSource {
    Url(String),
    Path(PathBuf),
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource::Url(DEFAULT_TYPEFACE_URL.to_string())
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Url(url) => f.write_str(url),
            FontSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Typeface {
    /// Load from whichever source is configured. One attempt, no retry.
    pub fn load(source: &FontSource) -> Result<Self, AssetError> {
        tracing::info!(%source, "loading typeface");
        let typeface = match source {
            FontSource::Url(url) => Self::fetch(url)?,
            FontSource::Path(path) => Self::from_path(path)?,
        };
        tracing::info!(
            family = %typeface.family_name,
            glyphs = typeface.glyphs.len(),
            "typeface loaded"
        );
        Ok(typeface)
    }

    /// Fetch a typeface over HTTP.
    pub fn fetch(url: &str) -> Result<Self, AssetError> {
        let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
        Self::from_json(&body)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, AssetError> {
        let typeface: Self = serde_json::from_str(data)?;
        typeface.validate()?;
        Ok(typeface)
    }

    /// Reject a typeface whose glyph coordinates cannot be scaled.
    pub fn validate(&self) -> Result<(), AssetError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(AssetError::InvalidTypeface(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        Ok(())
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphData> {
        let mut buf = [0u8; 4];
        self.glyphs.get(c.encode_utf8(&mut buf) as &str)
    }

    /// Glyph for `c`, falling back to `?`.
    pub fn glyph_or_fallback(&self, c: char) -> Option<&GlyphData> {
        self.glyph(c).or_else(|| self.glyph('?'))
    }

    /// Parsed outline of a glyph in font units.
    pub fn outline(&self, c: char) -> Result<Vec<PathCommand>, AssetError> {
        match self.glyph_or_fallback(c) {
            Some(glyph) => parse_outline(c, &glyph.o),
            None => Ok(Vec::new()),
        }
    }

    /// Vertical distance between baselines, in font units.
    pub fn line_height(&self) -> f32 {
        self.bounding_box.y_max - self.bounding_box.y_min + self.underline_thickness
    }
}

#[cfg(test)]
pub(crate) const TEST_TYPEFACE: &str = r#"{
    "familyName": "Testface",
    "resolution": 1000,
    "ascender": 1000,
    "descender": -300,
    "underlineThickness": 50,
    "boundingBox": { "xMin": 0, "xMax": 700, "yMin": -300, "yMax": 1000 },
    "glyphs": {
        "o": {
            "ha": 700, "x_min": 0, "x_max": 600,
            "o": "m 0 0 l 0 700 l 600 700 l 600 0 l 0 0 m 150 150 l 450 150 l 450 550 l 150 550 l 150 150"
        },
        "8": {
            "ha": 650, "x_min": 0, "x_max": 600,
            "o": "m 300 0 q 600 350 600 0 q 300 700 600 700 q 0 350 0 700 q 300 0 0 0"
        },
        "?": { "ha": 550, "x_min": 0, "x_max": 500, "o": "m 0 0 l 500 0 l 250 700" },
        " ": { "ha": 300 }
    }
}"#;
