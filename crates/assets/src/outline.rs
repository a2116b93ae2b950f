use glam::Vec2;

use crate::AssetError;

/// One drawing command from a glyph outline, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

impl PathCommand {
    fn scaled(self, scale: f32, offset: Vec2) -> Self {
        let t = |p: Vec2| p * scale + offset;
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(t(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(t(p)),
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo {
                ctrl: t(ctrl),
                to: t(to),
            },
            PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                ctrl1: t(ctrl1),
                ctrl2: t(ctrl2),
                to: t(to),
            },
        }
    }
}

/// A solid polygon and the holes cut out of it.
///
/// `outer` winds counter-clockwise, each hole clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphShape {
    pub outer: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

impl GlyphShape {
    /// Filled area: outer minus holes.
    pub fn area(&self) -> f32 {
        signed_area(&self.outer) + self.holes.iter().map(|h| signed_area(h)).sum::<f32>()
    }
}

/// Parse a typeface outline string.
///
/// Operands follow each verb with the end point first: `q x y cx cy` and
/// `b x y c1x c1y c2x c2y`.
pub(crate) fn parse_outline(glyph: char, outline: &str) -> Result<Vec<PathCommand>, AssetError> {
    let mut tokens = Tokens {
        glyph,
        inner: outline.split_whitespace(),
    };
    let mut commands = Vec::new();
    while let Some(verb) = tokens.inner.next() {
        let cmd = match verb {
            "m" => PathCommand::MoveTo(tokens.point(verb)?),
            "l" => PathCommand::LineTo(tokens.point(verb)?),
            "q" => {
                let to = tokens.point(verb)?;
                let ctrl = tokens.point(verb)?;
                PathCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = tokens.point(verb)?;
                let ctrl1 = tokens.point(verb)?;
                let ctrl2 = tokens.point(verb)?;
                PathCommand::CubicTo { ctrl1, ctrl2, to }
            }
            other => return Err(tokens.invalid(format!("unknown command {other:?}"))),
        };
        commands.push(cmd);
    }
    Ok(commands)
}

struct Tokens<'a> {
    glyph: char,
    inner: std::str::SplitWhitespace<'a>,
}

impl Tokens<'_> {
    fn invalid(&self, reason: String) -> AssetError {
        AssetError::InvalidOutline {
            glyph: self.glyph,
            reason,
        }
    }

    fn coord(&mut self, verb: &str) -> Result<f32, AssetError> {
        let tok = self
            .inner
            .next()
            .ok_or_else(|| self.invalid(format!("'{verb}' is missing operands")))?;
        tok.parse::<f32>()
            .map_err(|_| self.invalid(format!("bad number {tok:?} after '{verb}'")))
    }

    fn point(&mut self, verb: &str) -> Result<Vec2, AssetError> {
        Ok(Vec2::new(self.coord(verb)?, self.coord(verb)?))
    }
}

/// Flatten commands into closed contours, scaling font units into world units.
///
/// Straight segments contribute their end point; curves are sampled into
/// `segments` pieces. Consecutive duplicates and a repeated closing point are
/// dropped.
pub(crate) fn flatten(
    commands: &[PathCommand],
    scale: f32,
    offset: Vec2,
    segments: u32,
) -> Vec<Vec<Vec2>> {
    let segments = segments.max(1);
    let mut contours: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    let push = |contour: &mut Vec<Vec2>, p: Vec2| {
        if contour.last().is_none_or(|last| !last.abs_diff_eq(p, 1e-6)) {
            contour.push(p);
        }
    };

    for cmd in commands.iter().map(|c| c.scaled(scale, offset)) {
        match cmd {
            PathCommand::MoveTo(p) => {
                if !current.is_empty() {
                    contours.push(std::mem::take(&mut current));
                }
                current.push(p);
            }
            PathCommand::LineTo(p) => push(&mut current, p),
            PathCommand::QuadTo { ctrl, to } => {
                let from = current.last().copied().unwrap_or(to);
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let u = 1.0 - t;
                    push(&mut current, from * (u * u) + ctrl * (2.0 * u * t) + to * (t * t));
                }
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let from = current.last().copied().unwrap_or(to);
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    let u = 1.0 - t;
                    push(
                        &mut current,
                        from * (u * u * u)
                            + ctrl1 * (3.0 * u * u * t)
                            + ctrl2 * (3.0 * u * t * t)
                            + to * (t * t * t),
                    );
                }
            }
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }

    for contour in &mut contours {
        if contour.len() > 1 && contour[0].abs_diff_eq(contour[contour.len() - 1], 1e-6) {
            contour.pop();
        }
    }
    contours.retain(|c| c.len() >= 3);
    contours
}

/// Twice-halved shoelace area; positive for counter-clockwise winding.
pub(crate) fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Even-odd point-in-polygon test.
pub(crate) fn contains_point(polygon: &[Vec2], p: Vec2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Split contours into solids and holes.
///
/// The largest contour decides which winding means "solid"; contours wound the
/// other way are holes and go to the smallest solid that contains them.
/// Orphan holes are dropped.
pub(crate) fn classify(contours: Vec<Vec<Vec2>>) -> Vec<GlyphShape> {
    let contours: Vec<(Vec<Vec2>, f32)> = contours
        .into_iter()
        .map(|c| {
            let area = signed_area(&c);
            (c, area)
        })
        .filter(|(_, area)| area.abs() > f32::EPSILON)
        .collect();

    let Some(solid_sign) = contours
        .iter()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(_, area)| area.signum())
    else {
        return Vec::new();
    };

    let mut shapes = Vec::new();
    let mut holes = Vec::new();
    for (mut contour, area) in contours {
        if area.signum() == solid_sign {
            if area < 0.0 {
                contour.reverse();
            }
            shapes.push(GlyphShape {
                outer: contour,
                holes: Vec::new(),
            });
        } else {
            if area > 0.0 {
                contour.reverse();
            }
            holes.push(contour);
        }
    }

    for hole in holes {
        let owner = shapes
            .iter_mut()
            .filter(|s| contains_point(&s.outer, hole[0]))
            .min_by(|a, b| signed_area(&a.outer).total_cmp(&signed_area(&b.outer)));
        match owner {
            Some(shape) => shape.holes.push(hole),
            None => tracing::debug!(points = hole.len(), "dropping hole outside every solid"),
        }
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f32, max: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    #[test]
    fn parse_all_verbs() {
        let cmds = parse_outline('x', "m 0 0 l 10 0 q 20 10 20 0 b 0 10 10 20 0 20").unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(Vec2::ZERO),
                PathCommand::LineTo(Vec2::new(10.0, 0.0)),
                PathCommand::QuadTo {
                    ctrl: Vec2::new(20.0, 0.0),
                    to: Vec2::new(20.0, 10.0),
                },
                PathCommand::CubicTo {
                    ctrl1: Vec2::new(10.0, 20.0),
                    ctrl2: Vec2::new(0.0, 20.0),
                    to: Vec2::new(0.0, 10.0),
                },
            ]
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_outline('x', "m 0 0 z"),
            Err(AssetError::InvalidOutline { glyph: 'x', .. })
        ));
        assert!(parse_outline('x', "m 0").is_err());
        assert!(parse_outline('x', "l 0 abc").is_err());
        assert!(parse_outline('x', "").unwrap().is_empty());
    }

    #[test]
    fn flatten_lines_and_closing_point() {
        let cmds = parse_outline('x', "m 0 0 l 10 0 l 10 10 l 0 0").unwrap();
        let contours = flatten(&cmds, 0.1, Vec2::new(1.0, 0.0), 12);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0],
            vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 1.0)]
        );
    }

    #[test]
    fn flatten_curves_into_segments() {
        let cmds = parse_outline('x', "m 0 0 q 10 10 10 0 l 0 10").unwrap();
        let contours = flatten(&cmds, 1.0, Vec2::ZERO, 4);
        // start + 4 curve samples + line end
        assert_eq!(contours[0].len(), 6);
        assert!(contours[0][4].abs_diff_eq(Vec2::new(10.0, 10.0), 1e-6));
        // Midpoint of the quadratic sits between the chord and the control.
        let mid = contours[0][2];
        assert!(mid.abs_diff_eq(Vec2::new(7.5, 2.5), 1e-5));
    }

    #[test]
    fn flatten_drops_degenerate_contours() {
        let cmds = parse_outline('x', "m 0 0 l 5 5 m 0 0 l 1 0 l 1 1").unwrap();
        assert_eq!(flatten(&cmds, 1.0, Vec2::ZERO, 1).len(), 1);
    }

    #[test]
    fn signed_area_winding() {
        let ccw = square(0.0, 2.0);
        assert_eq!(signed_area(&ccw), 4.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(signed_area(&cw), -4.0);
    }

    #[test]
    fn point_in_polygon() {
        let sq = square(0.0, 2.0);
        assert!(contains_point(&sq, Vec2::new(1.0, 1.0)));
        assert!(!contains_point(&sq, Vec2::new(3.0, 1.0)));
    }

    #[test]
    fn classify_ring_with_font_winding() {
        // Fonts wind solids clockwise; classification must not care.
        let mut outer = square(0.0, 4.0);
        outer.reverse();
        let hole = square(1.0, 3.0);
        let shapes = classify(vec![outer, hole]);
        assert_eq!(shapes.len(), 1);
        assert!(signed_area(&shapes[0].outer) > 0.0);
        assert_eq!(shapes[0].holes.len(), 1);
        assert!(signed_area(&shapes[0].holes[0]) < 0.0);
        assert_eq!(shapes[0].area(), 12.0);
    }

    #[test]
    fn classify_separate_solids() {
        let a = square(0.0, 1.0);
        let b = square(5.0, 7.0);
        let shapes = classify(vec![a, b]);
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|s| s.holes.is_empty()));
    }

    #[test]
    fn classify_nested_hole_goes_to_smallest_container() {
        let big = square(0.0, 10.0);
        let mut big_hole = square(1.0, 9.0);
        big_hole.reverse();
        let island = square(3.0, 7.0);
        let mut island_hole = square(4.0, 6.0);
        island_hole.reverse();
        let shapes = classify(vec![big, big_hole, island, island_hole]);
        assert_eq!(shapes.len(), 2);
        let island_shape = shapes
            .iter()
            .find(|s| signed_area(&s.outer) == 16.0)
            .unwrap();
        assert_eq!(island_shape.holes.len(), 1);
        assert_eq!(island_shape.area(), 12.0);
    }
}
