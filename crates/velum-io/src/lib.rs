//! # velum-io
//!
//! The boundary between files and the simulation core: Wavefront OBJ and
//! JSON mesh loading, TOML scene descriptions, input validation and binary
//! state snapshots.

pub mod loader;
pub mod obj;
pub mod scene;
pub mod snapshot;
pub mod validator;

pub use loader::{load_mesh, save_mesh};
pub use obj::{parse_obj, write_obj};
pub use scene::{BodySpec, MeshSource, ObstacleSpec, Scene, SceneDescription};
pub use snapshot::StateSnapshot;
pub use validator::validate_scene;
