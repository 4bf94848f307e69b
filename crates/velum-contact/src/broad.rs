//! Broad phase bounding volumes.
//!
//! Axis-aligned boxes around triangles and particle paths. Anything whose
//! boxes do not overlap cannot collide, so the narrow phase only sees
//! candidates that survive this test.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_types::Scalar;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box enclosing all `points`. An empty slice gives a box at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(&first) = points.first() else {
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        };
        points.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |acc, &p| Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        )
    }

    /// Box enclosing the segment `a → b`.
    pub fn of_segment(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grows the box by `margin` on every side.
    pub fn inflate(self, margin: Scalar) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Returns true if the two boxes share at least one point.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Returns true if `p` lies inside or on the box.
    pub fn contains(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// Largest side length.
    pub fn max_extent(&self) -> Scalar {
        (self.max - self.min).max_element()
    }
}
