//! Integration tests for velum-math.

use velum_math::geometry::{
    intersect_ray_plane, point_line_distance, segment_triangle_intersection, triangle_area,
    triangle_normal, triangles_intersect,
};
use velum_math::inertia::{point_inertia, skew, try_inverse};
use velum_math::{Mat3, Vec3};

const EPS: f64 = 1e-7;

fn unit_corner_triangle() -> (Vec3, Vec3, Vec3) {
    (
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    )
}

// ─── Triangle Tests ───────────────────────────────────────────

#[test]
fn corner_triangle_area() {
    let (a, b, c) = unit_corner_triangle();
    assert!((triangle_area(a, b, c) - 3.0_f64.sqrt() / 2.0).abs() < EPS);
}

#[test]
fn normal_follows_winding() {
    let n = triangle_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert!((n - Vec3::Z).length() < EPS);
    let flipped = triangle_normal(Vec3::ZERO, Vec3::Y, Vec3::X);
    assert!((flipped + Vec3::Z).length() < EPS);
}

#[test]
fn degenerate_normal_is_zero() {
    let n = triangle_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
    assert_eq!(n, Vec3::ZERO);
}

// ─── Ray Tests ────────────────────────────────────────────────

#[test]
fn ray_through_diagonal_hits_centroid() {
    let (a, b, c) = unit_corner_triangle();
    let hit = intersect_ray_plane(Vec3::ZERO, Vec3::ONE, a, b, c).unwrap();
    assert!((hit - Vec3::splat(1.0 / 3.0)).length() < EPS);
}

#[test]
fn ray_in_xy_plane_hits_edge_midpoint() {
    let (a, b, c) = unit_corner_triangle();
    let hit = intersect_ray_plane(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), a, b, c).unwrap();
    assert!((hit - Vec3::new(0.5, 0.5, 0.0)).length() < EPS);
}

#[test]
fn ray_pointing_away_misses() {
    let (a, b, c) = unit_corner_triangle();
    assert!(intersect_ray_plane(Vec3::ZERO, -Vec3::ONE, a, b, c).is_none());
}

#[test]
fn ray_parallel_to_plane_misses() {
    let hit = intersect_ray_plane(
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::ZERO,
        Vec3::X,
        Vec3::Y,
    );
    assert!(hit.is_none());
}

// ─── Segment Tests ────────────────────────────────────────────

#[test]
fn segment_crosses_triangle() {
    let hit = segment_triangle_intersection(
        Vec3::new(0.25, 0.25, 1.0),
        Vec3::new(0.25, 0.25, -1.0),
        Vec3::ZERO,
        Vec3::X,
        Vec3::Y,
    )
    .unwrap();
    assert!((hit.t - 0.5).abs() < EPS);
    assert!((hit.point - Vec3::new(0.25, 0.25, 0.0)).length() < EPS);
}

#[test]
fn short_segment_does_not_reach() {
    let hit = segment_triangle_intersection(
        Vec3::new(0.25, 0.25, 1.0),
        Vec3::new(0.25, 0.25, 0.5),
        Vec3::ZERO,
        Vec3::X,
        Vec3::Y,
    );
    assert!(hit.is_none());
}

#[test]
fn segment_outside_triangle_misses() {
    let hit = segment_triangle_intersection(
        Vec3::new(2.0, 2.0, 1.0),
        Vec3::new(2.0, 2.0, -1.0),
        Vec3::ZERO,
        Vec3::X,
        Vec3::Y,
    );
    assert!(hit.is_none());
}

#[test]
fn crossing_triangles_intersect() {
    let flat = [Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
    let upright = [Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.5, 1.0)];
    assert!(triangles_intersect(flat, upright));

    let far = [Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 5.0, 5.0), Vec3::new(5.0, 6.0, 5.0)];
    assert!(!triangles_intersect(flat, far));
}

// ─── Line Distance Tests ──────────────────────────────────────

#[test]
fn point_line_distance_diagonal() {
    let l1 = Vec3::new(1.0, 1.0, 0.0);
    let l2 = Vec3::new(-1.0, -1.0, 0.0);
    let p = Vec3::new(1.0, 0.0, 0.0);
    assert!((point_line_distance(p, l1, l2) - 2.0_f64.sqrt() / 2.0).abs() < EPS);
}

#[test]
fn point_on_line_has_zero_distance() {
    let d = point_line_distance(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO, Vec3::ONE);
    assert!(d < EPS);
}

// ─── Inertia Tests ────────────────────────────────────────────

#[test]
fn skew_matches_cross_product() {
    let r = Vec3::new(1.0, -2.0, 3.0);
    let v = Vec3::new(0.5, 4.0, -1.0);
    assert!((skew(r) * v - r.cross(v)).length() < EPS);
}

#[test]
fn point_inertia_about_x_axis() {
    let i = point_inertia(2.0, Vec3::new(1.0, 0.0, 0.0));
    // m * (|r|² I - r rᵀ) = diag(0, 2, 2)
    let expected = Mat3::from_diagonal(Vec3::new(0.0, 2.0, 2.0));
    assert!((i - expected).abs_diff_eq(Mat3::ZERO, EPS));
}

#[test]
fn collinear_inertia_is_singular() {
    let i = point_inertia(1.0, Vec3::X) + point_inertia(1.0, -Vec3::X);
    assert!(try_inverse(i).is_none());
}

#[test]
fn full_rank_inertia_inverts() {
    let i = Mat3::from_diagonal(Vec3::new(2.0, 4.0, 8.0));
    let inv = try_inverse(i).unwrap();
    assert!((inv * i).abs_diff_eq(Mat3::IDENTITY, EPS));
}
