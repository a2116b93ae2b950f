use glam::{Vec2, Vec3};

use crate::outline::GlyphShape;
use crate::triangulate::triangulate;

/// Indexed triangle geometry with per-vertex normals.
///
/// Faces are flat shaded: vertices are not shared across faces with
/// different normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Append another geometry, rebasing its indices.
    pub fn append(&mut self, other: &Geometry) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        index
    }

    /// Axis-aligned cube centred on the origin.
    pub fn cube(size: f32) -> Self {
        let p = size * 0.5;
        // (normal, four corners wound counter-clockwise seen from outside)
        #[rustfmt::skip]
        let faces: [(Vec3, [[f32; 3]; 4]); 6] = [
            (Vec3::Z,     [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]),
            (Vec3::NEG_Z, [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]),
            (Vec3::X,     [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]),
            (Vec3::NEG_X, [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]),
            (Vec3::Y,     [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]),
            (Vec3::NEG_Y, [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]),
        ];
        let mut geometry = Self::new();
        for (normal, corners) in faces {
            let base = geometry.positions.len() as u32;
            for c in corners {
                geometry.push_vertex(Vec3::from_array(c), normal);
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        geometry
    }

    /// Extrude planar shapes from `z = 0` to `z = depth`.
    ///
    /// Produces a back cap facing -Z, a front cap facing +Z, and side walls
    /// with outward per-face normals.
    pub fn extrude(shapes: &[GlyphShape], depth: f32) -> Self {
        let mut geometry = Self::new();
        for shape in shapes {
            let (flat, triangles) = triangulate(&shape.outer, &shape.holes);

            let back = geometry.positions.len() as u32;
            for p in &flat {
                geometry.push_vertex(p.extend(0.0), Vec3::NEG_Z);
            }
            let front = geometry.positions.len() as u32;
            for p in &flat {
                geometry.push_vertex(p.extend(depth), Vec3::Z);
            }
            for [a, b, c] in &triangles {
                geometry
                    .indices
                    .extend_from_slice(&[back + a, back + c, back + b]);
                geometry
                    .indices
                    .extend_from_slice(&[front + a, front + b, front + c]);
            }

            geometry.extrude_walls(&shape.outer, depth);
            for hole in &shape.holes {
                geometry.extrude_walls(hole, depth);
            }
        }
        geometry
    }

    fn extrude_walls(&mut self, contour: &[Vec2], depth: f32) {
        let n = contour.len();
        for i in 0..n {
            let (a, b) = (contour[i], contour[(i + 1) % n]);
            let edge = b - a;
            if edge.length_squared() == 0.0 {
                continue;
            }
            // Right-hand side of a counter-clockwise outer edge (or clockwise
            // hole edge) points away from the solid.
            let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize();
            let i0 = self.push_vertex(a.extend(0.0), normal);
            let i1 = self.push_vertex(b.extend(0.0), normal);
            let i2 = self.push_vertex(b.extend(depth), normal);
            let i3 = self.push_vertex(a.extend(depth), normal);
            self.indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
        }
    }
}
