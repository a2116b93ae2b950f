use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::outline::{classify, flatten};
use crate::{AssetError, Typeface};

/// Parameters for extruded text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Em size in world units.
    pub size: f32,
    /// Extrusion depth along +Z.
    pub depth: f32,
    /// Samples per curve segment.
    pub curve_segments: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 1.0,
            depth: 0.2,
            curve_segments: 12,
        }
    }
}

impl TextOptions {
    pub fn validate(&self) -> Result<(), AssetError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(AssetError::InvalidOptions(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(AssetError::InvalidOptions(format!(
                "depth must be positive, got {}",
                self.depth
            )));
        }
        if self.curve_segments == 0 {
            return Err(AssetError::InvalidOptions(
                "curve_segments must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Geometry {
    /// Lay out `text` with `typeface` and extrude every glyph.
    ///
    /// Glyphs advance along +X from the origin; `\n` starts a new line below.
    /// Characters the typeface lacks fall back to `?`, or are skipped.
    pub fn text(typeface: &Typeface, text: &str, options: &TextOptions) -> Result<Self, AssetError> {
        options.validate()?;
        typeface.validate()?;
        let _span = tracing::info_span!("text_geometry", text).entered();

        let scale = options.size / typeface.resolution;
        let line_height = typeface.line_height() * scale;
        let mut offset = Vec2::ZERO;
        let mut geometry = Geometry::new();

        for c in text.chars() {
            if c == '\n' {
                offset = Vec2::new(0.0, offset.y - line_height);
                continue;
            }
            let Some(glyph) = typeface.glyph_or_fallback(c) else {
                tracing::warn!(glyph = %c, family = %typeface.family_name, "glyph missing from typeface");
                continue;
            };
            let commands = typeface.outline(c)?;
            let contours = flatten(&commands, scale, offset, options.curve_segments);
            let shapes = classify(contours);
            geometry.append(&Geometry::extrude(&shapes, options.depth));
            offset.x += glyph.ha * scale;
        }

        if geometry.is_empty() {
            return Err(AssetError::MissingGlyphs(text.to_string()));
        }
        tracing::debug!(
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            "text geometry built"
        );
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeface::TEST_TYPEFACE;
    use glam::Vec3;

    fn typeface() -> Typeface {
        Typeface::from_json(TEST_TYPEFACE).unwrap()
    }

    fn cap_area(g: &Geometry, z: f32) -> f32 {
        g.indices
            .chunks(3)
            .filter(|t| t.iter().all(|&i| g.positions[i as usize].z == z && g.normals[i as usize].z != 0.0))
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| g.positions[i as usize]);
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }

    #[test]
    fn letter_o_has_a_hole() {
        let g = Geometry::text(&typeface(), "o", &TextOptions::default()).unwrap();
        // 0.6 x 0.7 minus 0.3 x 0.4 at size 1 (resolution 1000).
        assert!((cap_area(&g, 0.2) - 0.30).abs() < 1e-4);
        assert!((cap_area(&g, 0.0) - 0.30).abs() < 1e-4);
    }

    #[test]
    fn default_options_match_scene_text() {
        let opts = TextOptions::default();
        assert_eq!(opts.size, 1.0);
        assert_eq!(opts.depth, 0.2);
        assert_eq!(opts.curve_segments, 12);
    }

    #[test]
    fn caps_face_outward() {
        let g = Geometry::text(&typeface(), "8", &TextOptions::default()).unwrap();
        let (lo, hi) = g.bounds().unwrap();
        assert_eq!(lo.z, 0.0);
        assert!((hi.z - 0.2).abs() < 1e-6);
        for (p, n) in g.positions.iter().zip(&g.normals) {
            if n.z != 0.0 {
                let expected = if p.z == 0.0 { Vec3::NEG_Z } else { Vec3::Z };
                assert_eq!(*n, expected);
            }
        }
    }

    #[test]
    fn glyphs_advance_along_x() {
        let opts = TextOptions::default();
        let single = Geometry::text(&typeface(), "o", &opts).unwrap();
        let pair = Geometry::text(&typeface(), "oo", &opts).unwrap();
        assert_eq!(pair.vertex_count(), single.vertex_count() * 2);
        let (_, hi) = pair.bounds().unwrap();
        // Second glyph starts at the first glyph's advance (0.7).
        assert!((hi.x - 1.3).abs() < 1e-5);
    }

    #[test]
    fn newline_moves_down() {
        let g = Geometry::text(&typeface(), "o\no", &TextOptions::default()).unwrap();
        let (lo, _) = g.bounds().unwrap();
        assert!((lo.y + 1.35).abs() < 1e-5);
    }

    #[test]
    fn unknown_glyph_uses_fallback() {
        let g = Geometry::text(&typeface(), "x", &TextOptions::default()).unwrap();
        assert!(!g.is_empty());
    }

    #[test]
    fn blank_text_is_an_error() {
        assert!(matches!(
            Geometry::text(&typeface(), " ", &TextOptions::default()),
            Err(AssetError::MissingGlyphs(_))
        ));
        assert!(Geometry::text(&typeface(), "", &TextOptions::default()).is_err());
    }

    #[test]
    fn invalid_options_rejected() {
        let opts = TextOptions {
            size: 0.0,
            ..TextOptions::default()
        };
        assert!(matches!(
            Geometry::text(&typeface(), "o", &opts),
            Err(AssetError::InvalidOptions(_))
        ));
        let opts = TextOptions {
            curve_segments: 0,
            ..TextOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn flat_extrusion_rejected() {
        let opts = TextOptions {
            depth: 0.0,
            ..TextOptions::default()
        };
        assert!(matches!(
            Geometry::text(&typeface(), "o", &opts),
            Err(AssetError::InvalidOptions(_))
        ));
    }

    #[test]
    fn unscalable_typeface_rejected_before_layout() {
        let mut tf = typeface();
        tf.resolution = 0.0;
        assert!(matches!(
            Geometry::text(&tf, "o", &TextOptions::default()),
            Err(AssetError::InvalidTypeface(_))
        ));
    }

    #[test]
    fn typeface_without_fallback_skips_unknown() {
        let mut tf = typeface();
        tf.glyphs.remove("?");
        let g = Geometry::text(&tf, "xo", &TextOptions::default()).unwrap();
        let (lo, _) = g.bounds().unwrap();
        // The skipped glyph does not advance the pen.
        assert!(lo.x.abs() < 1e-6);
    }
}
