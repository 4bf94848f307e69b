//! Simulated meshes: edges, triangles and mesh-level aggregates.
//!
//! A [`Mesh`] does not own particle data. Its edges and triangles hold
//! [`ParticleId`]s into the particle arena, and every geometric query takes
//! the arena as a slice and recomputes from live positions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use velum_math::geometry::{intersect_ray_plane, triangle_area, triangle_normal};
use velum_math::Vec3;
use velum_types::constants::EPSILON;
use velum_types::{ParticleId, Scalar, TriangleId, VelumError, VelumResult};

use crate::description::MeshDescription;
use crate::particle::Particle;
use crate::topology::Topology;

/// A mesh edge with its rest length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    /// Endpoints.
    pub v: [ParticleId; 2],
    /// Adjacent triangles; the second slot is `None` on boundary edges.
    pub triangles: [Option<TriangleId>; 2],
    /// Length in the undeformed configuration.
    pub rest_length: Scalar,
}

impl Edge {
    /// Returns true for edges with a single adjacent triangle.
    pub fn is_boundary(&self) -> bool {
        self.triangles[1].is_none()
    }

    /// Current length.
    pub fn length(&self, particles: &[Particle]) -> Scalar {
        (particles[self.v[0].index()].x - particles[self.v[1].index()].x).length()
    }
}

/// A mesh face. Normal and area are derived from live positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// Vertices in counter-clockwise order seen from the front.
    pub v: [ParticleId; 3],
}

impl Triangle {
    /// Constructs a triangle from three particle ids.
    pub fn new(v0: ParticleId, v1: ParticleId, v2: ParticleId) -> Self {
        Self { v: [v0, v1, v2] }
    }

    /// Current vertex positions.
    #[inline]
    pub fn positions(&self, particles: &[Particle]) -> [Vec3; 3] {
        [
            particles[self.v[0].index()].x,
            particles[self.v[1].index()].x,
            particles[self.v[2].index()].x,
        ]
    }

    /// Unit normal from the current positions (zero if degenerate).
    pub fn normal(&self, particles: &[Particle]) -> Vec3 {
        let [a, b, c] = self.positions(particles);
        triangle_normal(a, b, c)
    }

    /// Area from the current positions.
    pub fn area(&self, particles: &[Particle]) -> Scalar {
        let [a, b, c] = self.positions(particles);
        triangle_area(a, b, c)
    }

    /// Intersects the ray from `origin` through `through` with this
    /// triangle's plane.
    pub fn intersect_ray(&self, particles: &[Particle], origin: Vec3, through: Vec3) -> Option<Vec3> {
        let [a, b, c] = self.positions(particles);
        intersect_ray_plane(origin, through, a, b, c)
    }

    /// Returns the vertex that is neither `w0` nor `w1`.
    pub fn opposite_vertex(&self, w0: ParticleId, w1: ParticleId) -> ParticleId {
        let [a, b, c] = self.v;
        if a != w0 && a != w1 {
            a
        } else if b != w0 && b != w1 {
            b
        } else {
            c
        }
    }

    /// Returns true if `p` is one of the corners.
    pub fn contains(&self, p: ParticleId) -> bool {
        self.v.contains(&p)
    }
}

/// A deformable (or static) triangulated body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    /// Particle ids of the vertices, in description order.
    pub vertices: Vec<ParticleId>,
    /// Unique edges with rest lengths.
    pub edges: Vec<Edge>,
    /// Faces.
    pub triangles: Vec<Triangle>,
    /// Areal density used to distribute vertex masses (kg/m²).
    pub density: Scalar,
    /// Static meshes only take part in collision queries.
    pub is_static: bool,
    /// Enclosed volume of the undeformed mesh.
    rest_volume: Scalar,
    /// For each local vertex, the triangles that touch it.
    vertex_triangles: Vec<Vec<u32>>,
    /// Interior edges as `[v0, v1, wing_a, wing_b]` particle ids.
    hinges: Vec<[ParticleId; 4]>,
}

impl Mesh {
    /// Builds a mesh over already-created particles.
    ///
    /// `ids[i]` is the particle holding description vertex `i`. Rest
    /// lengths and rest volume are measured from the description.
    pub fn from_description(
        desc: &MeshDescription,
        ids: &[ParticleId],
        density: Scalar,
    ) -> VelumResult<Self> {
        desc.validate()?;
        if ids.len() != desc.vertex_count() {
            return Err(VelumError::InvalidMesh(format!(
                "Particle id count ({}) != vertex count ({})",
                ids.len(),
                desc.vertex_count()
            )));
        }

        let topology = Topology::build(desc);
        let pid = |v: u32| ids[v as usize];

        let mut edges = Vec::with_capacity(topology.edges.len());
        for (&[a, b], tris) in topology.edges.iter().zip(&topology.edge_triangles) {
            let rest_length = (desc.position(a as usize) - desc.position(b as usize)).length();
            if rest_length <= EPSILON {
                return Err(VelumError::InvalidMesh(format!(
                    "Edge ({}, {}) has zero rest length",
                    a, b
                )));
            }
            edges.push(Edge {
                v: [pid(a), pid(b)],
                triangles: [
                    tris.first().map(|&t| TriangleId(t)),
                    tris.get(1).map(|&t| TriangleId(t)),
                ],
                rest_length,
            });
        }

        let triangles = desc
            .indices
            .iter()
            .map(|&[a, b, c]| Triangle::new(pid(a), pid(b), pid(c)))
            .collect();

        let hinges = topology
            .interior_edges
            .iter()
            .map(|ie| [pid(ie.v0), pid(ie.v1), pid(ie.wing_a), pid(ie.wing_b)])
            .collect();

        let rest_volume = desc
            .indices
            .iter()
            .map(|&[a, b, c]| {
                let (p0, p1, p2) = (
                    desc.position(a as usize),
                    desc.position(b as usize),
                    desc.position(c as usize),
                );
                p0.dot(p1.cross(p2))
            })
            .sum::<Scalar>()
            / 6.0;

        Ok(Self {
            vertices: ids.to_vec(),
            edges,
            triangles,
            density,
            is_static: false,
            rest_volume,
            vertex_triangles: topology.vertex_triangles,
            hinges,
        })
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Enclosed volume of the undeformed mesh.
    pub fn rest_volume(&self) -> Scalar {
        self.rest_volume
    }

    /// Interior edges with their wing vertices: `[v0, v1, wing_a, wing_b]`.
    pub fn hinges(&self) -> &[[ParticleId; 4]] {
        &self.hinges
    }

    /// Triangles touching local vertex `i`.
    pub fn triangles_of_vertex(&self, i: usize) -> &[u32] {
        &self.vertex_triangles[i]
    }

    /// Returns true if every edge has two adjacent triangles.
    pub fn is_closed(&self) -> bool {
        !self.edges.is_empty() && self.edges.iter().all(|e| !e.is_boundary())
    }

    /// Sum of `p0 · (p1 × p2)` over all triangles: six times the signed
    /// enclosed volume.
    pub fn triple_product_sum(&self, particles: &[Particle]) -> Scalar {
        self.triangles
            .iter()
            .map(|t| {
                let [p0, p1, p2] = t.positions(particles);
                p0.dot(p1.cross(p2))
            })
            .sum()
    }

    /// Current signed enclosed volume (positive for outward winding).
    pub fn volume(&self, particles: &[Particle]) -> Scalar {
        self.triple_product_sum(particles) / 6.0
    }

    /// Total surface area from current positions.
    pub fn area(&self, particles: &[Particle]) -> Scalar {
        self.triangles.iter().map(|t| t.area(particles)).sum()
    }

    /// Per-vertex lumped area: one third of each incident triangle.
    pub fn vertex_areas(&self, particles: &[Particle]) -> Vec<Scalar> {
        let areas: Vec<Scalar> = self.triangles.iter().map(|t| t.area(particles)).collect();
        self.vertex_triangles
            .iter()
            .map(|tris| tris.iter().map(|&t| areas[t as usize]).sum::<Scalar>() / 3.0)
            .collect()
    }

    /// Redistributes vertex masses from current triangle areas and density.
    ///
    /// Vertices whose lumped area vanishes keep their previous mass.
    pub fn update_mass(&self, particles: &mut [Particle]) {
        let areas = self.vertex_areas(particles);
        for (&id, area) in self.vertices.iter().zip(areas) {
            let m = self.density * area;
            if m > 0.0 {
                particles[id.index()].m = m;
            }
        }
    }

    /// Center of mass from current positions and masses.
    pub fn center_of_mass(&self, particles: &[Particle]) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut total = 0.0;
        for &id in &self.vertices {
            let p = &particles[id.index()];
            sum += p.x * p.m;
            total += p.m;
        }
        if total > 0.0 {
            sum / total
        } else {
            Vec3::ZERO
        }
    }

    /// Current geometry as a description, vertices in mesh order.
    pub fn describe(&self, particles: &[Particle]) -> MeshDescription {
        let local: HashMap<ParticleId, u32> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();
        let positions = self.vertices.iter().map(|id| particles[id.index()].x).collect();
        let indices = self
            .triangles
            .iter()
            .filter_map(|t| Some([*local.get(&t.v[0])?, *local.get(&t.v[1])?, *local.get(&t.v[2])?]))
            .collect();
        MeshDescription::new(positions, indices)
    }
}
