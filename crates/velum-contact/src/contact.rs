//! Contact data types produced by the oracle.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_types::{ParticleId, Scalar, TriangleId};

/// A particle path that crossed a static triangle.
///
/// The particle system turns each hit into a one-sided collision
/// constraint that keeps the particle on the front side of the plane
/// through `entry_point` with normal `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentHit {
    /// Where the path met the triangle.
    pub entry_point: Vec3,
    /// Unit normal of the contacted triangle at probe time.
    pub normal: Vec3,
    /// Contacted triangle of the static mesh.
    pub triangle: TriangleId,
    /// Path parameter of the entry in `[0, 1]`.
    pub t: Scalar,
}

/// A vertex of a moving mesh that may be touching a static triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexContact {
    /// Vertex of the moving mesh.
    pub particle: ParticleId,
    /// Triangle of the static mesh it touches.
    pub triangle: TriangleId,
}
