//! # velum-math
//!
//! Linear algebra primitives for the Velum simulation engine.
//!
//! Provides:
//! - Re-exports of double-precision `glam` types under short names
//! - Point/line and ray/triangle geometric queries
//! - Skew-symmetric and inertia helpers used by rigid-motion damping

pub mod geometry;
pub mod inertia;

// Re-export glam's f64 types as the canonical math types for Velum.
pub use glam::{DMat3 as Mat3, DQuat as Quat, DVec3 as Vec3};
