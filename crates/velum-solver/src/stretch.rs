//! Edge inextensibility.
//!
//! `C(p1, p2) = |p1 - p2| - d`. The correction is split between the two
//! endpoints in proportion to their inverse masses, so a pinned endpoint
//! never moves.

use serde::{Deserialize, Serialize};
use velum_mesh::Particle;
use velum_types::constants::EPSILON;
use velum_types::{ParticleId, Scalar};

use crate::config::per_iteration_stiffness;

/// Distance constraint between two particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StretchConstraint {
    /// First endpoint.
    pub p1: ParticleId,
    /// Second endpoint.
    pub p2: ParticleId,
    /// Rest length `d`.
    pub rest_length: Scalar,
    /// Effective stiffness `k` in (0, 1].
    pub stiffness: Scalar,
    /// Per-sweep stiffness derived from `stiffness` and the sweep count.
    pub k_iter: Scalar,
}

impl StretchConstraint {
    /// Creates a constraint that reaches `stiffness` after `iterations` sweeps.
    pub fn new(
        p1: ParticleId,
        p2: ParticleId,
        rest_length: Scalar,
        stiffness: Scalar,
        iterations: u32,
    ) -> Self {
        Self {
            p1,
            p2,
            rest_length,
            stiffness,
            k_iter: per_iteration_stiffness(stiffness, iterations),
        }
    }

    /// Current constraint value `|p1 - p2| - d`.
    pub fn value(&self, particles: &[Particle]) -> Scalar {
        (particles[self.p1.index()].x - particles[self.p2.index()].x).length() - self.rest_length
    }

    /// Projects both endpoints toward the rest length.
    pub fn apply(&self, particles: &mut [Particle]) {
        let (i, j) = (self.p1.index(), self.p2.index());
        let diff = particles[i].x - particles[j].x;
        let len = diff.length();
        if len < EPSILON {
            return;
        }

        let w1 = particles[i].inv_mass();
        let w2 = particles[j].inv_mass();
        let w = w1 + w2;
        if w <= 0.0 {
            return;
        }

        let n = diff / len;
        let c = len - self.rest_length;
        particles[i].x -= n * (w1 / w * c * self.k_iter);
        particles[j].x += n * (w2 / w * c * self.k_iter);
    }
}
