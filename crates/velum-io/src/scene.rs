//! Scene descriptions.
//!
//! A scene is a TOML document naming deformable bodies, static obstacles
//! and the solver configuration:
//!
//! ```toml
//! duration = 2.0
//!
//! [config]
//! solver_iterations = 10
//!
//! [[bodies]]
//! pins = [0, 10]
//! mesh = { kind = "grid", cols = 10, rows = 10, width = 1.0, height = 1.0 }
//!
//! [[obstacles]]
//! offset = [0.0, -1.0, 0.0]
//! mesh = { kind = "file", path = "table.obj" }
//! ```
//!
//! Relative file paths resolve against the directory of the scene file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_mesh::generators::{cuboid, quad_grid, uv_sphere};
use velum_mesh::MeshDescription;
use velum_solver::{ParticleSystem, SimulationConfig};
use velum_types::{MeshId, Scalar, VelumError, VelumResult};

use crate::loader::load_mesh;
use crate::validator::validate_scene;

/// Where a body's geometry comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshSource {
    /// An OBJ or JSON mesh file.
    File { path: PathBuf },
    /// A rectangular sheet in the XY plane, see [`quad_grid`].
    Grid {
        cols: usize,
        rows: usize,
        width: Scalar,
        height: Scalar,
    },
    /// A closed sphere centered at the origin, see [`uv_sphere`].
    Sphere {
        radius: Scalar,
        stacks: usize,
        slices: usize,
    },
    /// An axis-aligned box, see [`cuboid`].
    Cuboid { low: [Scalar; 3], high: [Scalar; 3] },
}

impl MeshSource {
    /// Produces the mesh description, reading files relative to `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> VelumResult<MeshDescription> {
        match self {
            MeshSource::File { path } => load_mesh(base_dir.join(path)),
            MeshSource::Grid {
                cols,
                rows,
                width,
                height,
            } => {
                if *cols == 0 || *rows == 0 {
                    return Err(VelumError::InvalidConfig(
                        "grid needs at least one column and one row".into(),
                    ));
                }
                if !(*width > 0.0 && *height > 0.0) {
                    return Err(VelumError::InvalidConfig(
                        "grid width and height must be positive".into(),
                    ));
                }
                Ok(quad_grid(*cols, *rows, *width, *height))
            }
            MeshSource::Sphere {
                radius,
                stacks,
                slices,
            } => {
                if !(*radius > 0.0) {
                    return Err(VelumError::InvalidConfig(
                        "sphere radius must be positive".into(),
                    ));
                }
                Ok(uv_sphere(*radius, *stacks, *slices))
            }
            MeshSource::Cuboid { low, high } => {
                if low.iter().zip(high).any(|(l, h)| !(l < h)) {
                    return Err(VelumError::InvalidConfig(format!(
                        "cuboid low corner {low:?} must be below high corner {high:?}"
                    )));
                }
                Ok(cuboid(Vec3::from_array(*low), Vec3::from_array(*high)))
            }
        }
    }
}

/// A deformable body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Geometry.
    pub mesh: MeshSource,
    /// Translation applied after loading.
    #[serde(default)]
    pub offset: [Scalar; 3],
    /// Areal density (kg/m²). Falls back to `config.cloth_density`.
    #[serde(default)]
    pub density: Option<Scalar>,
    /// Vertex indices (into this body's mesh) to pin in place.
    #[serde(default)]
    pub pins: Vec<u32>,
    /// Adds stretch, bend and (closed meshes) pressure constraints.
    #[serde(default = "default_true")]
    pub constraints: bool,
}

/// A static collision obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Geometry.
    pub mesh: MeshSource,
    /// Translation applied after loading.
    #[serde(default)]
    pub offset: [Scalar; 3],
}

/// Everything needed to set up and run a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Simulated time in seconds.
    #[serde(default = "default_duration")]
    pub duration: Scalar,
    /// Solver configuration.
    #[serde(default)]
    pub config: SimulationConfig,
    /// Deformable bodies.
    #[serde(default)]
    pub bodies: Vec<BodySpec>,
    /// Static obstacles.
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    /// Directory that relative mesh paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_duration() -> Scalar {
    2.0
}

/// A scene turned into a live particle system.
pub struct Scene {
    /// The system, with gravity registered.
    pub system: ParticleSystem,
    /// Mesh ids of the deformable bodies, in description order.
    pub bodies: Vec<MeshId>,
    /// Mesh ids of the static obstacles, in description order.
    pub obstacles: Vec<MeshId>,
}

impl SceneDescription {
    /// Parses a scene from TOML text. Relative paths resolve against the
    /// current directory.
    pub fn from_toml_str(text: &str) -> VelumResult<Self> {
        toml::from_str(text).map_err(|e| VelumError::Serialization(e.to_string()))
    }

    /// Reads a scene file.
    pub fn load(path: impl AsRef<Path>) -> VelumResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut scene = Self::from_toml_str(&text)?;
        scene.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(scene)
    }

    /// Serializes the scene back to TOML.
    pub fn to_toml_string(&self) -> VelumResult<String> {
        toml::to_string_pretty(self).map_err(|e| VelumError::Serialization(e.to_string()))
    }

    /// Number of frames needed to cover `duration` at `config.dt`.
    pub fn frame_count(&self) -> u64 {
        // Tolerate roundoff in duration/dt so 2.0 s at 1/60 s is 120 frames.
        (self.duration / self.config.dt - 1e-9).ceil().max(0.0) as u64
    }

    /// Validates the scene and builds its particle system.
    pub fn build(&self) -> VelumResult<Scene> {
        validate_scene(self)?;

        let mut system = ParticleSystem::new(self.config.clone())?;
        system.add_gravity();

        let mut obstacles = Vec::with_capacity(self.obstacles.len());
        for spec in &self.obstacles {
            let mut desc = spec.mesh.resolve(&self.base_dir)?;
            desc.translate(Vec3::from_array(spec.offset));
            obstacles.push(system.add_static_mesh(&desc)?);
        }

        let mut bodies = Vec::with_capacity(self.bodies.len());
        for spec in &self.bodies {
            let mut desc = spec.mesh.resolve(&self.base_dir)?;
            desc.translate(Vec3::from_array(spec.offset));
            let density = spec.density.unwrap_or(self.config.cloth_density);
            let id = system.add_mesh(&desc, density)?;
            if spec.constraints {
                system.add_mesh_constraints(id)?;
            }
            let vertices = system.mesh(id)?.vertices.clone();
            for &pin in &spec.pins {
                let particle = vertices.get(pin as usize).copied().ok_or_else(|| {
                    VelumError::InvalidConfig(format!("pin {pin} is not a vertex of the body"))
                })?;
                system.set_pinned(particle, true)?;
            }
            bodies.push(id);
        }

        tracing::info!(
            bodies = bodies.len(),
            obstacles = obstacles.len(),
            particles = system.particles().len(),
            constraints = system.constraints().len(),
            "scene built"
        );
        Ok(Scene {
            system,
            bodies,
            obstacles,
        })
    }
}
