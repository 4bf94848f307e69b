//! Thread-safe handle around a [`ParticleSystem`].
//!
//! An input thread may add forces or drag particles while the simulation
//! thread advances time. Every operation here takes the lock exactly once
//! for its whole duration, so no caller ever observes a half-finished
//! frame. Constraint application never sees the handle and cannot
//! re-enter the lock.

use std::sync::{Arc, Mutex, MutexGuard};

use velum_math::Vec3;
use velum_types::{MeshId, ParticleId, VelumError, VelumResult};

use crate::constraint::{Constraint, Force};
use crate::report::FrameReport;
use crate::system::ParticleSystem;

/// Cloneable, lock-guarded particle system.
#[derive(Clone)]
pub struct SharedSystem {
    inner: Arc<Mutex<ParticleSystem>>,
}

impl SharedSystem {
    /// Wraps `system` for shared use.
    pub fn new(system: ParticleSystem) -> Self {
        Self {
            inner: Arc::new(Mutex::new(system)),
        }
    }

    fn lock(&self) -> VelumResult<MutexGuard<'_, ParticleSystem>> {
        self.inner.lock().map_err(|_| VelumError::LockPoisoned)
    }

    /// Runs `f` with exclusive access to the system.
    pub fn with<R>(&self, f: impl FnOnce(&mut ParticleSystem) -> R) -> VelumResult<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }

    /// Advances the whole frame under one lock.
    pub fn advance_time(&self, dt: f64) -> VelumResult<FrameReport> {
        self.lock()?.advance_time(dt)
    }

    /// Registers a force.
    pub fn add_force(&self, force: Force) -> VelumResult<()> {
        self.lock()?.add_force(force);
        Ok(())
    }

    /// Removes the first force equal to `force`.
    pub fn remove_force(&self, force: &Force) -> VelumResult<bool> {
        Ok(self.lock()?.remove_force(force))
    }

    /// Registers a persistent constraint.
    pub fn add_constraint(&self, constraint: Constraint) -> VelumResult<()> {
        self.lock()?.add_constraint(constraint);
        Ok(())
    }

    /// Creates a free particle.
    pub fn create_particle(&self, x0: Vec3) -> VelumResult<ParticleId> {
        Ok(self.lock()?.create_particle(x0))
    }

    /// Pins or releases a particle.
    pub fn set_pinned(&self, id: ParticleId, pinned: bool) -> VelumResult<()> {
        self.lock()?.set_pinned(id, pinned)
    }

    /// Damps one mesh toward rigid motion.
    pub fn global_velocity_damping(&self, coeff: f64, mesh: MeshId) -> VelumResult<()> {
        self.lock()?.global_velocity_damping(coeff, mesh)
    }

    /// Resets the system to its rest state.
    pub fn reset(&self) -> VelumResult<()> {
        self.lock()?.reset();
        Ok(())
    }

    /// Copy of every particle position, for renderers.
    pub fn positions(&self) -> VelumResult<Vec<Vec3>> {
        Ok(self.lock()?.particles().iter().map(|p| p.x).collect())
    }

    /// Current simulation time.
    pub fn time(&self) -> VelumResult<f64> {
        Ok(self.lock()?.time())
    }
}
