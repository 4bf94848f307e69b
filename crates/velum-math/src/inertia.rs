//! Rigid-body helpers: skew matrices and inertia tensors of point sets.

use velum_types::Scalar;

use crate::{Mat3, Vec3};

/// Skew-symmetric cross-product matrix: `skew(r) * v == r.cross(v)`.
#[inline]
pub fn skew(r: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, r.z, -r.y),
        Vec3::new(-r.z, 0.0, r.x),
        Vec3::new(r.y, -r.x, 0.0),
    )
}

/// Inertia contribution of a point mass at offset `r` from the centroid.
///
/// `m * skew(r) * skew(r)^T`, which equals `m * (|r|² I - r rᵀ)`.
#[inline]
pub fn point_inertia(mass: Scalar, r: Vec3) -> Mat3 {
    let s = skew(r);
    (s * s.transpose()) * mass
}

/// Inverts a 3×3 matrix, returning `None` when it is (nearly) singular.
///
/// Inertia tensors of collinear point sets are rank-deficient.
pub fn try_inverse(m: Mat3) -> Option<Mat3> {
    let det = m.determinant();
    let scale = m.x_axis.length_squared() + m.y_axis.length_squared() + m.z_axis.length_squared();
    if det.abs() <= 1e-12 * scale.max(1e-300).powf(1.5) {
        return None;
    }
    Some(m.inverse())
}
