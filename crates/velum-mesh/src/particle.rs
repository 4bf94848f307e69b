//! Mass points.
//!
//! Particles live in a single arena owned by the particle system and are
//! addressed by [`ParticleId`]. Mesh vertices are particles too.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_types::{ParticleId, Scalar};

/// A simulated mass point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Stable index of this particle in its arena.
    pub id: ParticleId,
    /// Deformed (current) position.
    pub x: Vec3,
    /// Position at the start of the current frame.
    pub x_prev: Vec3,
    /// Undeformed/material position, restored by `reset`.
    pub x0: Vec3,
    /// Velocity.
    pub v: Vec3,
    /// Force accumulator.
    pub f: Vec3,
    /// Mass (kg). Ignored while pinned.
    pub m: Scalar,
    /// Pinned particles never move and act as infinite mass.
    pub pinned: bool,

    // Pending deltas, folded in by `apply_changes`.
    dx: Vec3,
    dv: Vec3,
    df: Vec3,
}

impl Particle {
    /// Creates a particle at rest at material position `x0`.
    pub fn new(id: ParticleId, x0: Vec3, mass: Scalar) -> Self {
        Self {
            id,
            x: x0,
            x_prev: x0,
            x0,
            v: Vec3::ZERO,
            f: Vec3::ZERO,
            m: mass,
            pinned: false,
            dx: Vec3::ZERO,
            dv: Vec3::ZERO,
            df: Vec3::ZERO,
        }
    }

    /// Inverse mass used by position projections; zero when pinned.
    #[inline]
    pub fn inv_mass(&self) -> Scalar {
        if self.pinned || self.m <= 0.0 {
            0.0
        } else {
            1.0 / self.m
        }
    }

    /// Buffers a position change.
    pub fn add_position(&mut self, dx: Vec3) {
        self.dx += dx;
    }

    /// Buffers a velocity change.
    pub fn add_velocity(&mut self, dv: Vec3) {
        self.dv += dv;
    }

    /// Buffers a force contribution.
    pub fn add_force(&mut self, df: Vec3) {
        self.df += df;
    }

    /// Folds the buffered deltas into position, velocity and force.
    pub fn apply_changes(&mut self) {
        self.x += self.dx;
        self.v += self.dv;
        self.f += self.df;
        self.dx = Vec3::ZERO;
        self.dv = Vec3::ZERO;
        self.df = Vec3::ZERO;
    }

    /// Returns true if any delta is waiting for `apply_changes`.
    pub fn has_pending_changes(&self) -> bool {
        self.dx != Vec3::ZERO || self.dv != Vec3::ZERO || self.df != Vec3::ZERO
    }

    /// Restores the material position and clears all dynamic state.
    pub fn reset(&mut self) {
        self.x = self.x0;
        self.x_prev = self.x0;
        self.v = Vec3::ZERO;
        self.f = Vec3::ZERO;
        self.dx = Vec3::ZERO;
        self.dv = Vec3::ZERO;
        self.df = Vec3::ZERO;
        self.pinned = false;
    }

    /// Kinetic energy `0.5 * m * |v|²` (zero for pinned particles).
    pub fn kinetic_energy(&self) -> Scalar {
        if self.pinned {
            return 0.0;
        }
        0.5 * self.m * self.v.length_squared()
    }
}
