//! Enclosed-volume (pressure) constraint for closed meshes.
//!
//! `C = Σ p0 · (p1 × p2) - coeff · V̂0`, where the sum runs over all
//! triangles and `V̂0` is the rest value of that same sum (six times the
//! rest volume). A coefficient above one inflates the mesh.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_mesh::{Mesh, Particle};
use velum_types::constants::EPSILON;
use velum_types::{ParticleId, Scalar};

/// Volume constraint over every triangle of one mesh.
///
/// Fully stiff: no per-sweep stiffness is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureConstraint {
    /// Mesh vertices, in local order.
    pub vertices: Vec<ParticleId>,
    /// Triangles as local vertex indices.
    pub triangles: Vec<[u32; 3]>,
    /// Rest triple-product sum `V̂0`.
    pub rest_measure: Scalar,
    /// Target scale applied to `V̂0`.
    pub coeff: Scalar,
}

impl PressureConstraint {
    /// Builds the constraint for `mesh`, targeting `coeff` times its rest volume.
    pub fn new(mesh: &Mesh, coeff: Scalar) -> Self {
        let local: std::collections::HashMap<ParticleId, u32> = mesh
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();
        let triangles = mesh
            .triangles
            .iter()
            .map(|t| t.v.map(|id| local[&id]))
            .collect();
        Self {
            vertices: mesh.vertices.clone(),
            triangles,
            rest_measure: 6.0 * mesh.rest_volume(),
            coeff,
        }
    }

    /// Current triple-product sum, six times the signed enclosed volume.
    pub fn measure(&self, particles: &[Particle]) -> Scalar {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let [p0, p1, p2] = [a, b, c].map(|v| particles[self.vertices[v as usize].index()].x);
                p0.dot(p1.cross(p2))
            })
            .sum()
    }

    /// Current constraint value.
    pub fn value(&self, particles: &[Particle]) -> Scalar {
        self.measure(particles) - self.coeff * self.rest_measure
    }

    /// Per-vertex gradients of the triple-product sum.
    pub fn gradients(&self, particles: &[Particle]) -> Vec<Vec3> {
        let mut grad = vec![Vec3::ZERO; self.vertices.len()];
        for &[a, b, c] in &self.triangles {
            let [p0, p1, p2] = [a, b, c].map(|v| particles[self.vertices[v as usize].index()].x);
            grad[a as usize] += p1.cross(p2);
            grad[b as usize] += p2.cross(p0);
            grad[c as usize] += p0.cross(p1);
        }
        grad
    }

    /// Moves every vertex along its own gradient:
    /// `Δp_i = -∇_i C · C / |∇_i C|² · w_i`.
    ///
    /// Pinned vertices and vertices whose gradient vanishes do not move.
    pub fn apply(&self, particles: &mut [Particle]) {
        let c = self.value(particles);
        let grad = self.gradients(particles);

        for (&id, g) in self.vertices.iter().zip(grad) {
            let len2 = g.length_squared();
            if len2 < EPSILON {
                continue;
            }
            let p = &mut particles[id.index()];
            let w = p.inv_mass();
            p.x -= g * (c / len2 * w);
        }
    }
}
