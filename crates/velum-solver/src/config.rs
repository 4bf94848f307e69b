//! Simulation configuration.
//!
//! Every tunable knob of the particle system lives here and is passed to
//! [`ParticleSystem::new`](crate::ParticleSystem::new). The struct is
//! serde-friendly so scene files can embed it as a TOML table.

use serde::{Deserialize, Serialize};
use velum_types::constants;
use velum_types::{Scalar, VelumError, VelumResult};

/// Configuration for the particle system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Timestep used by drivers that do not pass their own (seconds).
    pub dt: Scalar,

    /// Constraint relaxation sweeps per timestep.
    pub solver_iterations: u32,

    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [Scalar; 3],

    /// Mass of free particles created without an explicit mass (kg).
    pub particle_mass: Scalar,

    /// Areal density of meshes added without an explicit density (kg/m²).
    pub cloth_density: Scalar,

    /// Rest length of distance constraints between free particles (m).
    pub stretch_distance: Scalar,

    /// Effective stretch stiffness after all sweeps, in (0, 1].
    pub stretch_stiffness: Scalar,

    /// Effective bend stiffness after all sweeps, in (0, 1].
    pub bend_stiffness: Scalar,

    /// Target volume scale for closed meshes (> 1 over-inflates).
    pub pressure_coeff: Scalar,

    /// Strength of the rigid-motion velocity damping applied after each
    /// frame. Zero disables it.
    pub global_damping: Scalar,

    /// Fraction of the reconstructed velocity kept each frame, in (0, 1].
    pub velocity_retention: Scalar,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: constants::DEFAULT_DT,
            solver_iterations: constants::DEFAULT_SOLVER_ITERATIONS,
            gravity: [0.0, -constants::GRAVITY, 0.0],
            particle_mass: constants::PARTICLE_MASS,
            cloth_density: constants::CLOTH_DENSITY,
            stretch_distance: constants::STRETCH_DISTANCE,
            stretch_stiffness: constants::STRETCH_STIFFNESS,
            bend_stiffness: constants::BEND_STIFFNESS,
            pressure_coeff: constants::PRESSURE_COEFF,
            global_damping: 0.0,
            velocity_retention: constants::VELOCITY_RETENTION,
        }
    }
}

impl SimulationConfig {
    /// Default config with global velocity damping enabled.
    pub fn damped() -> Self {
        Self {
            global_damping: constants::DAMP_COEFF,
            ..Default::default()
        }
    }

    /// Creates a config for debugging (fewer sweeps, no gravity).
    pub fn debug() -> Self {
        Self {
            solver_iterations: 3,
            gravity: [0.0; 3],
            ..Default::default()
        }
    }

    /// Creates a high-quality config (more sweeps, stiffer cloth).
    pub fn high_quality() -> Self {
        Self {
            solver_iterations: 30,
            stretch_stiffness: 0.95,
            ..Default::default()
        }
    }

    /// Checks every knob against its legal range.
    pub fn validate(&self) -> VelumResult<()> {
        let invalid = |msg: String| Err(VelumError::InvalidConfig(msg));

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return invalid(format!("dt must be positive, got {}", self.dt));
        }
        if self.solver_iterations == 0 {
            return invalid("solver_iterations must be at least 1".into());
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return invalid("gravity must be finite".into());
        }
        for (name, k) in [
            ("stretch_stiffness", self.stretch_stiffness),
            ("bend_stiffness", self.bend_stiffness),
            ("velocity_retention", self.velocity_retention),
        ] {
            if !(k > 0.0 && k <= 1.0) {
                return invalid(format!("{name} must be in (0, 1], got {k}"));
            }
        }
        for (name, v) in [
            ("particle_mass", self.particle_mass),
            ("cloth_density", self.cloth_density),
            ("stretch_distance", self.stretch_distance),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return invalid(format!("{name} must be positive, got {v}"));
            }
        }
        if !(self.pressure_coeff.is_finite() && self.pressure_coeff >= 0.0) {
            return invalid(format!(
                "pressure_coeff must be non-negative, got {}",
                self.pressure_coeff
            ));
        }
        if !(0.0..=1.0).contains(&self.global_damping) {
            return invalid(format!(
                "global_damping must be in [0, 1], got {}",
                self.global_damping
            ));
        }
        Ok(())
    }

    /// Gravity as a vector.
    pub fn gravity_vector(&self) -> velum_math::Vec3 {
        velum_math::Vec3::from_array(self.gravity)
    }
}

/// Per-sweep stiffness `1 - (1 - k)^(1/n)`.
///
/// Applying it `n` times compounds to the effective stiffness `k`.
#[inline]
pub fn per_iteration_stiffness(k: Scalar, iterations: u32) -> Scalar {
    1.0 - (1.0 - k).powf(1.0 / iterations.max(1) as Scalar)
}
