//! # velum-mesh
//!
//! The particle/mesh data model of the Velum engine.
//!
//! ## Key Types
//!
//! - [`Particle`]: A mass point: positions, velocity, force accumulator,
//!   pending deltas and the pinned flag.
//! - [`MeshDescription`]: Source geometry (positions + triangle indices),
//!   as produced by loaders and procedural generators.
//! - [`Mesh`]: A simulated body: vertex ids into the particle arena, edges
//!   with rest lengths, triangles, rest volume and density.
//! - [`Topology`]: Edge and adjacency extraction from a description.

pub mod description;
pub mod generators;
pub mod mesh;
pub mod normals;
pub mod particle;
pub mod topology;

pub use description::MeshDescription;
pub use mesh::{Edge, Mesh, Triangle};
pub use particle::Particle;
pub use topology::Topology;
