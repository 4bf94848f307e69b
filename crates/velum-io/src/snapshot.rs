//! State snapshot serialization for replay and debugging.
//!
//! Snapshots capture the dynamic particle state at a point in time so a run
//! can be resumed or compared frame by frame.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_solver::ParticleSystem;
use velum_types::{Scalar, VelumError, VelumResult};

/// Dynamic state of every particle of a system.
///
/// Serialized with `bincode` for compact binary output. Topology,
/// constraints and configuration are not included; restore into a system
/// built from the same scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Frames advanced when the snapshot was taken.
    pub frame: u64,
    /// Simulation time in seconds.
    pub time: Scalar,
    /// Particle positions.
    pub positions: Vec<Vec3>,
    /// Particle velocities.
    pub velocities: Vec<Vec3>,
    /// Pin flags.
    pub pinned: Vec<bool>,
}

impl StateSnapshot {
    /// Captures the current state of `system`.
    pub fn capture(system: &ParticleSystem) -> Self {
        let particles = system.particles();
        Self {
            frame: system.frame(),
            time: system.time(),
            positions: particles.iter().map(|p| p.x).collect(),
            velocities: particles.iter().map(|p| p.v).collect(),
            pinned: particles.iter().map(|p| p.pinned).collect(),
        }
    }

    /// Number of particles in the snapshot.
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Writes the snapshot back into `system`, which must hold the same
    /// number of particles.
    pub fn restore(&self, system: &mut ParticleSystem) -> VelumResult<()> {
        let n = system.particles().len();
        if self.positions.len() != n || self.velocities.len() != n || self.pinned.len() != n {
            return Err(VelumError::InvalidConfig(format!(
                "snapshot holds {} particles, system has {}",
                self.positions.len(),
                n
            )));
        }

        for (i, ((&x, &v), &pinned)) in self
            .positions
            .iter()
            .zip(&self.velocities)
            .zip(&self.pinned)
            .enumerate()
        {
            let p = system.particle_mut(velum_types::ParticleId(i as u32))?;
            p.x = x;
            p.x_prev = x;
            p.v = v;
            p.f = Vec3::ZERO;
            p.pinned = pinned;
        }
        system.update_colliders();
        system.set_clock(self.time, self.frame);
        Ok(())
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> VelumResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| VelumError::Serialization(e.to_string()))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> VelumResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| VelumError::Serialization(format!("snapshot decode failed: {e}")))
    }

    /// Writes the binary snapshot to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> VelumResult<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a binary snapshot from `path`.
    pub fn load(path: impl AsRef<Path>) -> VelumResult<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}
