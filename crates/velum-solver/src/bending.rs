//! Dihedral bending.
//!
//! Resists folding across an interior edge shared by two triangles. The
//! rest state is flat: the constraint is `C = acos(n1 · n2) - π` with the
//! triangle normals taken relative to the first shared vertex.
//!
//! ## Geometry
//!
//! For an interior edge (p1, p2) with wing vertices (p3, p4):
//! ```text
//!        p3
//!       / \
//!      /   \
//!    p1 ─── p2
//!      \   /
//!       \ /
//!        p4
//! ```

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_mesh::Particle;
use velum_types::constants::EPSILON;
use velum_types::{ParticleId, Scalar};

use crate::config::per_iteration_stiffness;

/// Bend constraint over one interior edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendConstraint {
    /// `[p1, p2, p3, p4]`: shared edge first, then the two wings.
    pub p: [ParticleId; 4],
    /// Effective stiffness `k` in (0, 1].
    pub stiffness: Scalar,
    /// Per-sweep stiffness derived from `stiffness` and the sweep count.
    pub k_iter: Scalar,
}

impl BendConstraint {
    /// Creates a bend constraint for edge `(p1, p2)` with wings `p3`, `p4`.
    pub fn new(p: [ParticleId; 4], stiffness: Scalar, iterations: u32) -> Self {
        Self {
            p,
            stiffness,
            k_iter: per_iteration_stiffness(stiffness, iterations),
        }
    }

    /// Current dihedral angle between the wings, π when flat.
    pub fn angle(&self, particles: &[Particle]) -> Scalar {
        let [a, b, c, d] = self.p.map(|id| particles[id.index()].x);
        dihedral_angle(a, b, c, d)
    }

    /// Projects the four vertices toward the flat configuration.
    pub fn apply(&self, particles: &mut [Particle]) {
        let idx = self.p.map(|id| id.index());
        let p1 = particles[idx[0]].x;
        let p2 = particles[idx[1]].x - p1;
        let p3 = particles[idx[2]].x - p1;
        let p4 = particles[idx[3]].x - p1;

        let c23 = p2.cross(p3);
        let c24 = p2.cross(p4);
        let l23 = c23.length();
        let l24 = c24.length();
        if l23 < EPSILON || l24 < EPSILON {
            return;
        }

        let n1 = c23 / l23;
        let n2 = c24 / l24;
        let d = n1.dot(n2).clamp(-1.0, 1.0);

        let q3 = (p2.cross(n2) + n1.cross(p2) * d) / l23;
        let q4 = (p2.cross(n1) + n2.cross(p2) * d) / l24;
        let q2 = -(p3.cross(n2) + n1.cross(p3) * d) / l23 - (p4.cross(n1) + n2.cross(p4) * d) / l24;
        let q1 = -q2 - q3 - q4;
        let q = [q1, q2, q3, q4];

        let w = idx.map(|i| particles[i].inv_mass());
        let denom: Scalar = w.iter().zip(&q).map(|(wi, qi)| wi * qi.length_squared()).sum();
        if denom < EPSILON {
            return;
        }

        let c = d.acos() - std::f64::consts::PI;
        let s = -(1.0 - d * d).sqrt() * c;

        for k in 0..4 {
            particles[idx[k]].x += q[k] * (w[k] * s / denom * self.k_iter);
        }
    }
}

/// Dihedral angle between the wings `wa` and `wb` around edge `(v0, v1)`.
///
/// Measured between the wing directions projected onto the plane
/// perpendicular to the edge, so a flat pair with wings on opposite
/// sides gives π and a fully folded pair gives 0.
pub fn dihedral_angle(v0: Vec3, v1: Vec3, wa: Vec3, wb: Vec3) -> Scalar {
    let edge = v1 - v0;
    let edge_len = edge.length();
    if edge_len < EPSILON {
        return std::f64::consts::PI;
    }
    let edge_dir = edge / edge_len;

    // Remove component along edge
    let to_a = wa - v0;
    let to_b = wb - v0;
    let perp_a = to_a - edge_dir * to_a.dot(edge_dir);
    let perp_b = to_b - edge_dir * to_b.dot(edge_dir);

    let len_a = perp_a.length();
    let len_b = perp_b.length();
    if len_a < EPSILON || len_b < EPSILON {
        return std::f64::consts::PI;
    }

    (perp_a / len_a).dot(perp_b / len_b).clamp(-1.0, 1.0).acos()
}
