//! Geometric queries on points, lines, rays and triangles.
//!
//! Everything here is stateless and works on live positions; callers
//! never cache the results because particles move every iteration.

use velum_types::constants::{DEGENERATE_AREA_THRESHOLD, EPSILON};
use velum_types::Scalar;

use crate::Vec3;

/// Unnormalized triangle normal `(b - a) × (c - a)`.
///
/// Its length is twice the triangle area. Counter-clockwise winding
/// (seen from the tip of the normal) is the front side.
#[inline]
pub fn triangle_cross(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Unit triangle normal, or `Vec3::ZERO` for a degenerate triangle.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = triangle_cross(a, b, c);
    let len = n.length();
    if len < DEGENERATE_AREA_THRESHOLD {
        return Vec3::ZERO;
    }
    n / len
}

/// Triangle area.
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> Scalar {
    triangle_cross(a, b, c).length() * 0.5
}

/// Perpendicular vector from `p` to the infinite line through `start` and `end`.
///
/// Returns the vector from `p` to its projection onto the line. For a
/// degenerate line (`start == end`) this is `start - p`.
pub fn perp_vector_from_point_to_line(p: Vec3, start: Vec3, end: Vec3) -> Vec3 {
    let dir = end - start;
    let len = dir.length();
    let to_end = end - p;
    if len < EPSILON {
        return start - p;
    }
    let dir = dir / len;
    to_end - dir * to_end.dot(dir)
}

/// Distance from `p` to the infinite line through `start` and `end`.
pub fn point_line_distance(p: Vec3, start: Vec3, end: Vec3) -> Scalar {
    perp_vector_from_point_to_line(p, start, end).length()
}

/// Intersect the ray from `origin` through `through` with the plane of
/// triangle `(a, b, c)`.
///
/// The hit is not clipped to the triangle. Returns `None` when the
/// triangle is degenerate, the ray is parallel to the plane, or the
/// plane lies behind the ray origin.
pub fn intersect_ray_plane(origin: Vec3, through: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let n = triangle_cross(a, b, c);
    if n.length_squared() == 0.0 {
        return None;
    }

    let dir = through - origin;
    let num = -n.dot(origin - a);
    let den = n.dot(dir);
    if den.abs() < EPSILON {
        return None;
    }

    let r = num / den;
    if r < 0.0 {
        return None;
    }
    Some(origin + dir * r)
}

/// A crossing of a segment through a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCrossing {
    /// Point where the segment meets the triangle.
    pub point: Vec3,
    /// Segment parameter of the crossing in `[0, 1]`.
    pub t: Scalar,
}

/// Segment/triangle intersection (Möller–Trumbore), both sides.
///
/// Edges and vertices of the triangle count as inside, so a segment
/// sliding along a shared edge is reported by both neighbours.
pub fn segment_triangle_intersection(
    p0: Vec3,
    p1: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
) -> Option<SegmentCrossing> {
    let dir = p1 - p0;
    let e1 = b - a;
    let e2 = c - a;

    let h = dir.cross(e2);
    let det = e1.dot(h);
    if det.abs() < DEGENERATE_AREA_THRESHOLD {
        return None; // Parallel or degenerate
    }
    let inv_det = 1.0 / det;

    let s = p0 - a;
    let u = s.dot(h) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    Some(SegmentCrossing {
        point: p0 + dir * t,
        t,
    })
}

/// Returns true if the two triangles intersect.
///
/// Tests every edge of each triangle against the other triangle. Coplanar
/// overlaps are not reported.
pub fn triangles_intersect(ta: [Vec3; 3], tb: [Vec3; 3]) -> bool {
    let edges_cross = |edges: &[Vec3; 3], tri: &[Vec3; 3]| {
        (0..3).any(|i| {
            let p0 = edges[i];
            let p1 = edges[(i + 1) % 3];
            segment_triangle_intersection(p0, p1, tri[0], tri[1], tri[2]).is_some()
        })
    };
    edges_cross(&ta, &tb) || edges_cross(&tb, &ta)
}
