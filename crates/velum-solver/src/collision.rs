//! One-sided collision constraint against a static triangle.
//!
//! `C = (p - entry) · n`. Particles on the front side of the contact
//! plane are left alone; particles behind it are moved back onto it.

use serde::{Deserialize, Serialize};
use velum_contact::SegmentHit;
use velum_math::Vec3;
use velum_mesh::Particle;
use velum_types::constants::EPSILON;
use velum_types::{ParticleId, Scalar, TriangleId};

/// Transient contact constraint, rebuilt every relaxation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionConstraint {
    /// Constrained particle.
    pub particle: ParticleId,
    /// Point where the particle path entered the obstacle.
    pub entry_point: Vec3,
    /// Normal of the contacted triangle at contact time.
    pub normal: Vec3,
    /// Contacted triangle of the static mesh.
    pub triangle: TriangleId,
}

impl CollisionConstraint {
    /// Builds a constraint from an oracle hit.
    pub fn from_hit(particle: ParticleId, hit: &SegmentHit) -> Self {
        Self {
            particle,
            entry_point: hit.entry_point,
            normal: hit.normal,
            triangle: hit.triangle,
        }
    }

    /// Signed distance along the normal, negative when penetrating.
    pub fn value(&self, particles: &[Particle]) -> Scalar {
        (particles[self.particle.index()].x - self.entry_point).dot(self.normal)
    }

    /// Pushes the particle back onto the contact plane if it is behind it.
    ///
    /// Returns true when a correction was applied.
    pub fn apply(&self, particles: &mut [Particle]) -> bool {
        let len2 = self.normal.length_squared();
        if len2 < EPSILON {
            return false;
        }
        let c = self.value(particles);
        if c >= 0.0 {
            return false;
        }
        particles[self.particle.index()].x -= self.normal * (c / len2);
        true
    }
}
