//! Physical constants and simulation defaults.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.8;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: Scalar = 1.0 / 60.0;

/// Default number of constraint relaxation sweeps per timestep.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Default mass of a free particle (kg).
pub const PARTICLE_MASS: Scalar = 1.0;

/// Default areal density of cloth meshes (kg/m²).
pub const CLOTH_DENSITY: Scalar = 10.0;

/// Default rest length for free particle distance constraints (m).
pub const STRETCH_DISTANCE: Scalar = 0.1;

/// Default effective stretch stiffness in (0, 1].
pub const STRETCH_STIFFNESS: Scalar = 0.8;

/// Default effective bend stiffness in (0, 1].
pub const BEND_STIFFNESS: Scalar = 0.2;

/// Default inflation factor for closed meshes.
pub const PRESSURE_COEFF: Scalar = 0.6;

/// Global velocity damping coefficient used by damped presets.
pub const DAMP_COEFF: Scalar = 0.1;

/// Fraction of the reconstructed velocity kept after each frame.
pub const VELOCITY_RETENTION: Scalar = 0.95;

/// Epsilon for degenerate denominators.
pub const EPSILON: Scalar = 1.0e-7;

/// Epsilon for degenerate triangle detection (area threshold).
pub const DEGENERATE_AREA_THRESHOLD: Scalar = 1.0e-12;
