//! Scalar type alias for the simulation.
//!
//! Position-based projections divide by small denominators (bend gradients,
//! squared volume gradients), so the CPU solver runs in double precision.

/// The floating-point type used throughout the simulation.
pub type Scalar = f64;
