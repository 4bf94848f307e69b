//! Benchmark scenarios: procedural meshes, pins and config for each case.
//!
//! Four canonical scenarios for regression testing:
//! 1. **Hanging sheet**: vertical cloth pinned along its top row
//! 2. **Balloon**: closed sphere inflated by its pressure constraint
//! 3. **Cloth on cube**: horizontal cloth falls onto a static box
//! 4. **Sphere drape**: horizontal cloth falls onto a static sphere

use serde::{Deserialize, Serialize};

use velum_math::Vec3;
use velum_mesh::generators::{cuboid, quad_grid, uv_sphere};
use velum_mesh::MeshDescription;
use velum_solver::SimulationConfig;
use velum_types::Scalar;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Cloth pinned at its top edge, hanging under gravity.
    HangingSheet,
    /// Pressurized sphere in zero gravity.
    Balloon,
    /// Cloth dropped onto a box.
    ClothOnCube,
    /// Cloth dropped onto a sphere.
    SphereDrape,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::HangingSheet,
            ScenarioKind::Balloon,
            ScenarioKind::ClothOnCube,
            ScenarioKind::SphereDrape,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::HangingSheet => "hanging_sheet",
            ScenarioKind::Balloon => "balloon",
            ScenarioKind::ClothOnCube => "cloth_on_cube",
            ScenarioKind::SphereDrape => "sphere_drape",
        }
    }

    /// Looks a kind up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// The deformable body.
    pub cloth: MeshDescription,
    /// Static obstacle, if any.
    pub obstacle: Option<MeshDescription>,
    /// Vertex indices of `cloth` to pin.
    pub pins: Vec<u32>,
    /// Solver configuration; `config.dt` is the frame step.
    pub config: SimulationConfig,
    /// Number of frames to simulate.
    pub frames: u32,
}

/// Lays an XY-plane grid flat in the XZ plane at height `y`.
fn lay_flat(mut desc: MeshDescription, y: Scalar) -> MeshDescription {
    for p in &mut desc.positions {
        *p = Vec3::new(p.x, y, p.y);
    }
    desc
}

impl Scenario {
    /// Create the hanging sheet scenario.
    ///
    /// A 1m × 1m cloth at 20×20 resolution, pinned along the top row,
    /// hanging under gravity for 2 seconds at 60fps.
    pub fn hanging_sheet() -> Self {
        let cols = 20;
        let mut cloth = quad_grid(cols, 20, 1.0, 1.0);
        cloth.translate(Vec3::new(0.0, 1.0, 0.0));

        Self {
            kind: ScenarioKind::HangingSheet,
            cloth,
            obstacle: None,
            pins: (0..=cols as u32).collect(),
            config: SimulationConfig::default(),
            frames: 120,
        }
    }

    /// Create the balloon scenario.
    ///
    /// A coarse, heavy sphere of radius 0.5m inflating toward 1.5× its
    /// rest volume without gravity. The skin is dense enough that the
    /// inverse masses sum to about one, which keeps each pressure
    /// projection from overshooting.
    pub fn balloon() -> Self {
        Self {
            kind: ScenarioKind::Balloon,
            cloth: uv_sphere(0.5, 6, 12),
            obstacle: None,
            pins: Vec::new(),
            config: SimulationConfig {
                gravity: [0.0; 3],
                pressure_coeff: 1.5,
                cloth_density: 1200.0,
                ..SimulationConfig::default()
            },
            frames: 90,
        }
    }

    /// Create the cloth-on-cube scenario.
    ///
    /// A 1.5m × 1.5m cloth falls from 0.3m above a 1m cube.
    pub fn cloth_on_cube() -> Self {
        let mut cloth = lay_flat(quad_grid(20, 20, 1.5, 1.5), 0.8);
        // Keep cloth vertices off the obstacle's face diagonals.
        cloth.translate(Vec3::new(0.013, 0.0, 0.029));
        let obstacle = cuboid(Vec3::new(-0.5, -0.5, -0.5), Vec3::new(0.5, 0.5, 0.5));

        Self {
            kind: ScenarioKind::ClothOnCube,
            cloth,
            obstacle: Some(obstacle),
            pins: Vec::new(),
            config: SimulationConfig::default(),
            frames: 120,
        }
    }

    /// Create the sphere drape scenario.
    ///
    /// A 1.5m × 1.5m cloth at 20×20 resolution falls onto
    /// a sphere of radius 0.3m centered at the origin.
    pub fn sphere_drape() -> Self {
        let mut cloth = lay_flat(quad_grid(20, 20, 1.5, 1.5), 0.5);
        // Keep the center vertex off the sphere's pole.
        cloth.translate(Vec3::new(0.013, 0.0, 0.029));

        Self {
            kind: ScenarioKind::SphereDrape,
            cloth,
            obstacle: Some(uv_sphere(0.3, 16, 32)),
            pins: Vec::new(),
            config: SimulationConfig::default(),
            frames: 180,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::HangingSheet => Self::hanging_sheet(),
            ScenarioKind::Balloon => Self::balloon(),
            ScenarioKind::ClothOnCube => Self::cloth_on_cube(),
            ScenarioKind::SphereDrape => Self::sphere_drape(),
        }
    }

    /// Replaces the solver configuration.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }
}
