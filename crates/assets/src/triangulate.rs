use glam::Vec2;

const EPS: f32 = 1e-9;

/// Triangulate a counter-clockwise polygon with clockwise holes.
///
/// Returns the vertex list (outer ring followed by each hole, no duplicates)
/// and counter-clockwise triangles indexing into it. Holes are stitched into
/// the outer ring through bridge edges, then the merged ring is ear-clipped.
pub fn triangulate(outer: &[Vec2], holes: &[Vec<Vec2>]) -> (Vec<Vec2>, Vec<[u32; 3]>) {
    let mut vertices: Vec<Vec2> = outer.to_vec();
    let mut ring: Vec<usize> = (0..outer.len()).collect();

    // Rightmost holes first so later bridges can land on earlier holes.
    let mut hole_ranges: Vec<(usize, usize)> = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        let start = vertices.len();
        vertices.extend_from_slice(hole);
        hole_ranges.push((start, hole.len()));
    }
    hole_ranges.sort_by(|a, b| {
        let max_x = |(start, len): (usize, usize)| {
            vertices[start..start + len]
                .iter()
                .map(|p| p.x)
                .fold(f32::MIN, f32::max)
        };
        max_x(*b).total_cmp(&max_x(*a))
    });

    for (start, len) in hole_ranges {
        bridge_hole(&vertices, &mut ring, start, len);
    }

    let triangles = ear_clip(&vertices, ring)
        .into_iter()
        .map(|[a, b, c]| [a as u32, b as u32, c as u32])
        .collect();
    (vertices, triangles)
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

/// Inclusive point-in-triangle test for a counter-clockwise triangle.
fn in_triangle(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> bool {
    cross(a, b, p) >= -EPS && cross(b, c, p) >= -EPS && cross(c, a, p) >= -EPS
}

/// Splice a hole into the ring through a mutually visible vertex pair.
fn bridge_hole(vertices: &[Vec2], ring: &mut Vec<usize>, start: usize, len: usize) {
    if ring.is_empty() {
        return;
    }
    let hole_start = (start..start + len)
        .max_by(|&a, &b| {
            vertices[a]
                .x
                .total_cmp(&vertices[b].x)
                .then(vertices[b].y.total_cmp(&vertices[a].y))
        })
        .unwrap_or(start);
    let m = vertices[hole_start];

    // Nearest ring edge hit by a ray from M towards +x.
    let n = ring.len();
    let mut hit: Option<(f32, usize)> = None;
    for k in 0..n {
        let (ia, ib) = (ring[k], ring[(k + 1) % n]);
        let (a, b) = (vertices[ia], vertices[ib]);
        if a.y == b.y || m.y < a.y.min(b.y) || m.y > a.y.max(b.y) {
            continue;
        }
        let x = a.x + (m.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x >= m.x && hit.is_none_or(|(best, _)| x < best) {
            let pick = if a.x >= b.x { k } else { (k + 1) % n };
            hit = Some((x, pick));
        }
    }

    let bridge_pos = match hit {
        Some((x, pick)) => {
            let p = vertices[ring[pick]];
            let i = Vec2::new(x, m.y);
            // Anything inside triangle (M, I, P) would block the bridge; take
            // the blocker closest in angle to the ray instead.
            let (t0, t1, t2) = if cross(m, i, p) >= 0.0 { (m, i, p) } else { (m, p, i) };
            let mut best = pick;
            let mut best_key = (f32::INFINITY, f32::INFINITY);
            for (pos, &idx) in ring.iter().enumerate() {
                let v = vertices[idx];
                if v == p || v.x < m.x || !in_triangle(t0, t1, t2, v) {
                    continue;
                }
                let dx = (v.x - m.x).max(EPS);
                let key = ((v.y - m.y).abs() / dx, v.distance_squared(m));
                if key < best_key {
                    best_key = key;
                    best = pos;
                }
            }
            best
        }
        None => ring
            .iter()
            .enumerate()
            .min_by(|a, b| {
                vertices[*a.1]
                    .distance_squared(m)
                    .total_cmp(&vertices[*b.1].distance_squared(m))
            })
            .map(|(pos, _)| pos)
            .unwrap_or(0),
    };

    let mut spliced = Vec::with_capacity(ring.len() + len + 2);
    spliced.extend_from_slice(&ring[..=bridge_pos]);
    spliced.extend((0..len).map(|k| start + (hole_start - start + k) % len));
    spliced.push(hole_start);
    spliced.push(ring[bridge_pos]);
    spliced.extend_from_slice(&ring[bridge_pos + 1..]);
    *ring = spliced;
}

fn is_ear(vertices: &[Vec2], ring: &[usize], k: usize) -> bool {
    let n = ring.len();
    let (ia, ib, ic) = (ring[(k + n - 1) % n], ring[k], ring[(k + 1) % n]);
    let (a, b, c) = (vertices[ia], vertices[ib], vertices[ic]);
    if cross(a, b, c) <= EPS {
        return false;
    }
    ring.iter().enumerate().all(|(pos, &idx)| {
        if pos == k || pos == (k + 1) % n || pos == (k + n - 1) % n {
            return true;
        }
        let v = vertices[idx];
        v == a || v == b || v == c || !in_triangle(a, b, c, v)
    })
}

fn ear_clip(vertices: &[Vec2], mut ring: Vec<usize>) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut cursor = 0;

    while ring.len() > 3 {
        let n = ring.len();
        let corner = |k: usize| {
            let (a, b, c) = (ring[(k + n - 1) % n], ring[k], ring[(k + 1) % n]);
            (a, b, c, cross(vertices[a], vertices[b], vertices[c]))
        };

        // Collinear points and zero-width spikes carry no area.
        if let Some(k) = (0..n).find(|&k| corner(k).3.abs() <= EPS) {
            ring.remove(k);
            continue;
        }

        let found = (0..n)
            .map(|step| (cursor + step) % n)
            .find(|&k| is_ear(vertices, &ring, k));
        let k = match found {
            Some(k) => k,
            None => {
                // Self-touching input: clip the most convex corner to make progress.
                tracing::trace!(remaining = n, "no clean ear; forcing a clip");
                (0..n)
                    .max_by(|&x, &y| corner(x).3.total_cmp(&corner(y).3))
                    .unwrap_or(0)
            }
        };
        let (a, b, c, area) = corner(k);
        if area > 0.0 {
            triangles.push([a, b, c]);
        }
        ring.remove(k);
        cursor = if k == 0 { 0 } else { k - 1 };
    }

    if ring.len() == 3 && cross(vertices[ring[0]], vertices[ring[1]], vertices[ring[2]]) > EPS {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
    triangles
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

    fn total_area(vertices: &[Vec2], tris: &[[u32; 3]]) -> f32 {
        tris.iter()
            .map(|t| {
                let area = 0.5
                    * cross(
                        vertices[t[0] as usize],
                        vertices[t[1] as usize],
                        vertices[t[2] as usize],
                    );
                assert!(area > 0.0, "triangle {t:?} is not counter-clockwise");
                area
            })
            .sum()
    }

    fn circle(center: Vec2, radius: f32, n: usize, ccw: bool) -> Vec<Vec2> {
        let mut pts: Vec<Vec2> = (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                center + Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        if !ccw {
            pts.reverse();
        }
        pts
    }

    #[test]
    fn triangle_passes_through() {
        let tri = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        let (verts, tris) = triangulate(&tri, &[]);
        assert_eq!(verts.len(), 3);
        assert_eq!(tris, vec![[0, 1, 2]]);
    }

    #[test]
    fn square_is_two_triangles() {
        let (verts, tris) = triangulate(&square(0.0, 2.0), &[]);
        assert_eq!(tris.len(), 2);
        assert!((total_area(&verts, &tris) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn concave_polygon() {
        // An L shape.
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let (verts, tris) = triangulate(&l, &[]);
        assert_eq!(tris.len(), 4);
        assert!((total_area(&verts, &tris) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn square_with_hole() {
        let mut hole = square(1.0, 3.0);
        hole.reverse();
        let (verts, tris) = triangulate(&square(0.0, 4.0), &[hole]);
        assert_eq!(verts.len(), 8);
        assert!((total_area(&verts, &tris) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn ring_like_letter_o() {
        let outer = circle(Vec2::ZERO, 1.0, 48, true);
        let inner = circle(Vec2::new(0.05, 0.0), 0.6, 48, false);
        let expected = crate::outline::signed_area(&outer) + crate::outline::signed_area(&inner);
        let (verts, tris) = triangulate(&outer, &[inner]);
        assert!((total_area(&verts, &tris) - expected).abs() < 1e-3);
    }

    #[test]
    fn two_holes_like_digit_eight() {
        let outer = square(0.0, 10.0);
        let mut upper = square(2.0, 4.0);
        upper.iter_mut().for_each(|p| p.y += 4.0);
        upper.reverse();
        let mut lower = square(2.0, 4.0);
        lower.iter_mut().for_each(|p| p.x += 4.0);
        lower.reverse();
        let (verts, tris) = triangulate(&outer, &[upper, lower]);
        assert!((total_area(&verts, &tris) - 92.0).abs() < 1e-3);
    }

    #[test]
    fn collinear_points_are_dropped() {
        let pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let (verts, tris) = triangulate(&pts, &[]);
        assert!((total_area(&verts, &tris) - 4.0).abs() < 1e-5);
    }
}
