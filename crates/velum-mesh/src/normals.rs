//! Vertex normals for renderers.
//!
//! Computes area-weighted vertex normals by accumulating face normals
//! from each adjacent triangle. The solver never uses these.

use velum_math::geometry::triangle_cross;
use velum_math::Vec3;

use crate::description::MeshDescription;
use crate::mesh::Mesh;
use crate::particle::Particle;

/// Area-weighted unit normals for each vertex of `mesh`, in vertex order.
///
/// Vertices with no incident area get `Vec3::ZERO`.
pub fn vertex_normals(mesh: &Mesh, particles: &[Particle]) -> Vec<Vec3> {
    (0..mesh.vertex_count())
        .map(|i| {
            let sum: Vec3 = mesh
                .triangles_of_vertex(i)
                .iter()
                .map(|&t| {
                    let [a, b, c] = mesh.triangles[t as usize].positions(particles);
                    triangle_cross(a, b, c)
                })
                .sum();
            sum.normalize_or_zero()
        })
        .collect()
}

/// Area-weighted unit normals of an undeformed description.
pub fn description_normals(desc: &MeshDescription) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; desc.vertex_count()];
    for &[a, b, c] in &desc.indices {
        let n = triangle_cross(
            desc.position(a as usize),
            desc.position(b as usize),
            desc.position(c as usize),
        );
        normals[a as usize] += n;
        normals[b as usize] += n;
        normals[c as usize] += n;
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}
