//! The collision oracle and its triangle-mesh implementation.

use std::collections::BTreeMap;

use velum_math::geometry::{segment_triangle_intersection, triangle_normal, triangles_intersect};
use velum_math::Vec3;
use velum_mesh::{Mesh, Particle, Triangle};
use velum_types::constants::EPSILON;
use velum_types::{Scalar, TriangleId};

use crate::broad::Aabb;
use crate::contact::{SegmentHit, VertexContact};
use crate::spatial_hash::SpatialHash;

/// How far behind its start point a probed path is extended (m).
const CONTACT_TOLERANCE: Scalar = 1e-9;

/// Answers collision queries against one (static) body.
///
/// Implementations cache geometry in [`update`](Self::update); queries
/// between updates see the cached positions.
pub trait CollisionOracle: Send {
    /// Rebuilds internal structures from current particle positions.
    fn update(&mut self, particles: &[Particle]);

    /// Cached triangle corners, indexed by triangle id.
    fn triangle_positions(&self) -> &[[Vec3; 3]];

    /// First crossing of the path `prev → curr` through any triangle.
    fn probe_segment(&self, prev: Vec3, curr: Vec3) -> Option<SegmentHit>;

    /// All intersecting triangle pairs as `(self_triangle, other_triangle)`.
    fn probe_mesh_pairs(&self, other: &dyn CollisionOracle) -> Vec<(TriangleId, TriangleId)>;

    /// Returns the oracle name.
    fn name(&self) -> &str;
}

/// Vertices of `moving` whose triangles intersect the body behind
/// `oracle`, each mapped to the oracle triangle it touches.
///
/// A vertex shared by several colliding triangles keeps the last one
/// found. Results are ordered by particle id.
pub fn potential_vertex_contacts(
    oracle: &dyn CollisionOracle,
    moving: &MeshCollider,
) -> Vec<VertexContact> {
    let mut contacts = BTreeMap::new();
    for (mine, theirs) in oracle.probe_mesh_pairs(moving) {
        for particle in moving.triangle(theirs).v {
            contacts.insert(particle, mine);
        }
    }
    contacts
        .into_iter()
        .map(|(particle, triangle)| VertexContact { particle, triangle })
        .collect()
}

/// Oracle over the triangles of a [`Mesh`], accelerated by a spatial hash.
#[derive(Debug, Clone)]
pub struct MeshCollider {
    triangles: Vec<Triangle>,
    positions: Vec<[Vec3; 3]>,
    normals: Vec<Vec3>,
    bounds: Vec<Aabb>,
    hash: SpatialHash,
    fixed_cell_size: Option<Scalar>,
}

impl MeshCollider {
    /// Builds a collider with a cell size derived from the triangle sizes.
    pub fn new(mesh: &Mesh, particles: &[Particle]) -> Self {
        Self::build(mesh, particles, None)
    }

    /// Builds a collider with an explicit spatial hash cell size.
    pub fn with_cell_size(mesh: &Mesh, particles: &[Particle], cell_size: Scalar) -> Self {
        Self::build(mesh, particles, Some(cell_size))
    }

    fn build(mesh: &Mesh, particles: &[Particle], fixed_cell_size: Option<Scalar>) -> Self {
        let mut collider = Self {
            triangles: mesh.triangles.clone(),
            positions: Vec::new(),
            normals: Vec::new(),
            bounds: Vec::new(),
            hash: SpatialHash::new(fixed_cell_size.unwrap_or(1.0)),
            fixed_cell_size,
        };
        collider.update(particles);
        collider
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle `t` as particle ids.
    pub fn triangle(&self, t: TriangleId) -> &Triangle {
        &self.triangles[t.index()]
    }

    /// Cached unit normal of triangle `t`.
    pub fn normal(&self, t: TriangleId) -> Vec3 {
        self.normals[t.index()]
    }

    /// Cell size currently used by the spatial hash.
    pub fn cell_size(&self) -> Scalar {
        self.hash.cell_size()
    }

    /// Vertices of `other` whose triangles intersect this mesh, each
    /// mapped to the triangle of this mesh it touches.
    pub fn potential_vertex_contacts(&self, other: &MeshCollider) -> Vec<VertexContact> {
        potential_vertex_contacts(self, other)
    }

    fn auto_cell_size(&self) -> Scalar {
        if self.bounds.is_empty() {
            return 1.0;
        }
        let mean = self.bounds.iter().map(Aabb::max_extent).sum::<Scalar>()
            / self.bounds.len() as Scalar;
        mean.max(1e-3)
    }
}

impl CollisionOracle for MeshCollider {
    fn update(&mut self, particles: &[Particle]) {
        self.positions = self.triangles.iter().map(|t| t.positions(particles)).collect();
        self.normals = self
            .positions
            .iter()
            .map(|&[a, b, c]| triangle_normal(a, b, c))
            .collect();
        self.bounds = self.positions.iter().map(|p| Aabb::from_points(p)).collect();

        let cell_size = self.fixed_cell_size.unwrap_or_else(|| self.auto_cell_size());
        self.hash = SpatialHash::new(cell_size);
        for (t, b) in self.bounds.iter().enumerate() {
            self.hash.insert(t as u32, b);
        }

        tracing::trace!(
            triangles = self.triangles.len(),
            cells = self.hash.occupied_cells(),
            cell_size,
            "collider rebuilt"
        );
    }

    fn triangle_positions(&self) -> &[[Vec3; 3]] {
        &self.positions
    }

    fn probe_segment(&self, prev: Vec3, curr: Vec3) -> Option<SegmentHit> {
        let len = (curr - prev).length();
        if len == 0.0 {
            return None;
        }
        // Start slightly behind `prev` so a particle resting on a face
        // still registers when it moves through it.
        let start = prev - (curr - prev) * (CONTACT_TOLERANCE / len);
        let span = len + CONTACT_TOLERANCE;

        let query = Aabb::of_segment(start, curr).inflate(EPSILON);
        let mut best: Option<SegmentHit> = None;

        for t in self.hash.query(&query) {
            let t = t as usize;
            if !self.bounds[t].inflate(EPSILON).overlaps(&query) {
                continue;
            }
            let [a, b, c] = self.positions[t];
            let Some(crossing) = segment_triangle_intersection(start, curr, a, b, c) else {
                continue;
            };
            let along = ((crossing.t * span - CONTACT_TOLERANCE) / len).clamp(0.0, 1.0);
            if best.map_or(true, |h| along < h.t) {
                best = Some(SegmentHit {
                    entry_point: crossing.point,
                    normal: self.normals[t],
                    triangle: TriangleId(t as u32),
                    t: along,
                });
            }
        }

        best
    }

    fn probe_mesh_pairs(&self, other: &dyn CollisionOracle) -> Vec<(TriangleId, TriangleId)> {
        let mut pairs = Vec::new();
        for (j, &theirs) in other.triangle_positions().iter().enumerate() {
            let bounds = Aabb::from_points(&theirs).inflate(EPSILON);
            for i in self.hash.query(&bounds) {
                let mine = self.positions[i as usize];
                if self.bounds[i as usize].overlaps(&bounds) && triangles_intersect(mine, theirs) {
                    pairs.push((TriangleId(i), TriangleId(j as u32)));
                }
            }
        }
        pairs
    }

    fn name(&self) -> &str {
        "mesh_collider"
    }
}
