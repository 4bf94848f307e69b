//! # velum-solver
//!
//! Position-based dynamics: forces, constraint projection and the
//! particle system loop.
//!
//! ## Key Types
//!
//! - [`ParticleSystem`]: Particle arena, meshes, forces and constraints;
//!   advances time with a predict-then-relax loop
//! - [`SimulationConfig`]: Every tunable knob, serde/TOML friendly
//! - [`Constraint`] / [`Force`]: Closed sets of position constraints and
//!   accumulated forces
//! - [`SharedSystem`]: Mutex-guarded handle for multi-threaded drivers
//! - [`FrameReport`]: Per-frame statistics

pub mod bending;
pub mod collision;
pub mod config;
pub mod constraint;
pub mod damping;
pub mod gravity;
pub mod pressure;
pub mod report;
pub mod shared;
pub mod stretch;
pub mod system;

pub use config::SimulationConfig;
pub use constraint::{Constraint, Force};
pub use report::FrameReport;
pub use shared::SharedSystem;
pub use system::ParticleSystem;
