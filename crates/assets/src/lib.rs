//! Asset pipeline: typeface descriptions in, extruded text geometry out.
//!
//! A typeface is fetched once (by URL or from disk), its glyph outlines are
//! flattened into polygons, triangulated with holes, and extruded along Z.
//!
//! # Invariants
//! - Loading never panics on malformed input; every failure is an `AssetError`.
//! - Generated geometry is immutable once built.
//! - Cap faces sit at `z = 0` (facing -Z) and `z = depth` (facing +Z).

mod geometry;
mod outline;
mod text;
mod triangulate;
mod typeface;

pub use geometry::Geometry;
pub use outline::{GlyphShape, PathCommand};
pub use text::TextOptions;
pub use triangulate::triangulate;
pub use typeface::{BoundingBox, FontSource, GlyphData, Typeface, DEFAULT_TYPEFACE_URL};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid typeface: {0}")]
    InvalidTypeface(String),
    #[error("invalid outline for glyph {glyph:?}: {reason}")]
    InvalidOutline { glyph: char, reason: String },
    #[error("no drawable glyphs in {0:?}")]
    MissingGlyphs(String),
    #[error("invalid text options: {0}")]
    InvalidOptions(String),
}
