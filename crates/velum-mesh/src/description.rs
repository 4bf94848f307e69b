//! Source geometry for a mesh before it enters the simulation.
//!
//! A description is plain data: vertex positions and triangle index
//! triples. Loaders and procedural generators produce descriptions; the
//! particle system turns them into particles plus a [`Mesh`](crate::Mesh).

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_types::{VelumError, VelumResult};

/// Vertex positions and triangle indices of one triangulated surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangles as `[v0, v1, v2]`, counter-clockwise seen from the front.
    pub indices: Vec<[u32; 3]>,
}

impl MeshDescription {
    /// Creates a description from positions and triangles.
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { positions, indices }
    }

    /// Creates an empty description with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        self.positions[i]
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        self.indices[t]
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Validates index bounds and rejects triangles with repeated vertices.
    ///
    /// Manifoldness and consistent winding are not checked.
    pub fn validate(&self) -> VelumResult<()> {
        let n = self.positions.len();

        for (t, tri) in self.indices.iter().enumerate() {
            for &idx in tri {
                if idx as usize >= n {
                    return Err(VelumError::InvalidMesh(format!(
                        "Triangle {} references vertex {} (vertex count: {})",
                        t, idx, n
                    )));
                }
            }
            let [a, b, c] = *tri;
            if a == b || b == c || a == c {
                return Err(VelumError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        if self.positions.iter().any(|p| !p.is_finite()) {
            return Err(VelumError::InvalidMesh(
                "Vertex positions must be finite".into(),
            ));
        }

        Ok(())
    }

    /// Constructs a description from interleaved `[x0, y0, z0, x1, ...]`
    /// positions and flat `[a0, b0, c0, a1, ...]` indices.
    pub fn from_interleaved(positions: &[f64], indices: &[u32]) -> VelumResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(VelumError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }
        if indices.len() % 3 != 0 {
            return Err(VelumError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        let desc = Self {
            positions: positions
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect(),
            indices: indices
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect(),
        };

        desc.validate()?;
        Ok(desc)
    }
}
