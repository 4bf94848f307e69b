//! Uniform gravity.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_mesh::Particle;

/// Adds `m * g` to the pending force of every unpinned particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    /// Acceleration (m/s²).
    pub g: Vec3,
}

impl Gravity {
    /// Gravity with the given acceleration vector.
    pub fn new(g: Vec3) -> Self {
        Self { g }
    }

    /// Accumulates the weight of each unpinned particle.
    pub fn apply(&self, particles: &mut [Particle]) {
        for p in particles.iter_mut().filter(|p| !p.pinned) {
            p.add_force(self.g * p.m);
        }
    }

    /// Potential energy `-m g · x` summed over unpinned particles.
    pub fn potential_energy(&self, particles: &[Particle]) -> velum_types::Scalar {
        particles
            .iter()
            .filter(|p| !p.pinned)
            .map(|p| -p.m * self.g.dot(p.x))
            .sum()
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -velum_types::constants::GRAVITY, 0.0))
    }
}
