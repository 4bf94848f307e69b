//! Mesh topology extraction.
//!
//! Builds the unique edge list and adjacency data from the triangle index
//! buffer of a [`MeshDescription`]. The stretch constraints need every
//! edge, the bend constraints need interior edges with their wing vertices.

use std::collections::HashMap;

use crate::description::MeshDescription;

/// Precomputed topology information for a triangle mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    /// For each vertex, the list of triangles that contain it.
    pub vertex_triangles: Vec<Vec<u32>>,

    /// Unique edges as `[v_min, v_max]` pairs, in first-seen order.
    pub edges: Vec<[u32; 2]>,

    /// For each edge, the adjacent triangles (one for boundary edges).
    pub edge_triangles: Vec<Vec<u32>>,

    /// Interior edges that have exactly 2 adjacent triangles.
    pub interior_edges: Vec<InteriorEdge>,
}

/// An interior (non-boundary) edge with its two adjacent triangles.
///
/// ```text
///        wa
///       / \
///      /   \
///    v0 ─── v1
///      \   /
///       \ /
///        wb
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InteriorEdge {
    /// Index into [`Topology::edges`].
    pub edge: u32,
    /// Index of vertex A of the shared edge.
    pub v0: u32,
    /// Index of vertex B of the shared edge.
    pub v1: u32,
    /// The "wing" vertex of triangle A (not on the edge).
    pub wing_a: u32,
    /// The "wing" vertex of triangle B (not on the edge).
    pub wing_b: u32,
    /// Index of adjacent triangle A.
    pub tri_a: u32,
    /// Index of adjacent triangle B.
    pub tri_b: u32,
}

impl Topology {
    /// Build topology from a mesh description.
    ///
    /// Edge order is deterministic (first appearance in the index buffer),
    /// which keeps the Gauss–Seidel sweep order reproducible.
    pub fn build(desc: &MeshDescription) -> Self {
        let vertex_count = desc.vertex_count();
        let tri_count = desc.triangle_count();

        let mut vertex_triangles: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        for t in 0..tri_count {
            for v in desc.triangle(t) {
                vertex_triangles[v as usize].push(t as u32);
            }
        }

        // Key: (min_vertex, max_vertex) to canonicalize edge direction
        let mut edge_index: HashMap<(u32, u32), usize> = HashMap::new();
        let mut edges: Vec<[u32; 2]> = Vec::new();
        let mut edge_triangles: Vec<Vec<u32>> = Vec::new();

        for t in 0..tri_count {
            let [a, b, c] = desc.triangle(t);
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                let idx = *edge_index.entry(key).or_insert_with(|| {
                    edges.push([key.0, key.1]);
                    edge_triangles.push(Vec::new());
                    edges.len() - 1
                });
                edge_triangles[idx].push(t as u32);
            }
        }

        let mut interior_edges = Vec::new();
        for (idx, (&[v0, v1], tris)) in edges.iter().zip(&edge_triangles).enumerate() {
            if tris.len() > 2 {
                tracing::warn!(v0, v1, count = tris.len(), "non-manifold edge, bending uses first two faces");
            }
            if tris.len() >= 2 {
                let tri_a = tris[0];
                let tri_b = tris[1];
                interior_edges.push(InteriorEdge {
                    edge: idx as u32,
                    v0,
                    v1,
                    wing_a: find_wing_vertex(desc, tri_a, v0, v1),
                    wing_b: find_wing_vertex(desc, tri_b, v0, v1),
                    tri_a,
                    tri_b,
                });
            }
        }

        Self {
            vertex_triangles,
            edges,
            edge_triangles,
            interior_edges,
        }
    }

    /// Returns the number of boundary edges (edges with only 1 adjacent triangle).
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_triangles
            .iter()
            .filter(|tris| tris.len() == 1)
            .count()
    }

    /// Returns true if the mesh is closed (no boundary edges).
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}

/// Find the vertex in triangle `tri` that is not v0 or v1 (the "wing" vertex).
fn find_wing_vertex(desc: &MeshDescription, tri: u32, v0: u32, v1: u32) -> u32 {
    let [a, b, c] = desc.triangle(tri as usize);
    if a != v0 && a != v1 {
        a
    } else if b != v0 && b != v1 {
        b
    } else {
        c
    }
}
