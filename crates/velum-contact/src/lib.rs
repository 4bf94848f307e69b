//! # velum-contact
//!
//! Collision detection against static scenery.
//!
//! The oracle answers two questions for the particle system:
//! 1. **Segment probes**: did the straight path of a particle during the
//!    current step cross a static triangle, and where did it enter?
//! 2. **Mesh pairs**: which triangles of two meshes intersect?
//!
//! Both queries go through a spatial hash of triangle bounding boxes
//! (broad phase) before exact segment/triangle tests (narrow phase).

pub mod broad;
pub mod contact;
pub mod oracle;
pub mod spatial_hash;

pub use broad::Aabb;
pub use contact::{SegmentHit, VertexContact};
pub use oracle::{potential_vertex_contacts, CollisionOracle, MeshCollider};
pub use spatial_hash::SpatialHash;
