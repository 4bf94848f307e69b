//! Rigid-motion velocity damping.
//!
//! Pulls every particle velocity toward the rigid-body field
//! `v_cm + ω × r` of its group. This removes the spurious energy that
//! stretch projections inject while leaving rigid translation and rotation
//! untouched.

use velum_math::inertia::{point_inertia, try_inverse};
use velum_math::{Mat3, Vec3};
use velum_mesh::Particle;
use velum_types::{ParticleId, Scalar};

/// Damps the velocities of `ids` toward their rigid-body motion by `coeff`.
///
/// A collinear group has a singular inertia tensor and gets no angular
/// term. Pinned particles contribute mass but are not modified.
pub fn damp_velocities(coeff: Scalar, ids: &[ParticleId], particles: &mut [Particle]) {
    let mut total_mass = 0.0;
    let mut x_cm = Vec3::ZERO;
    let mut v_cm = Vec3::ZERO;
    for &id in ids {
        let p = &particles[id.index()];
        total_mass += p.m;
        x_cm += p.x * p.m;
        v_cm += p.v * p.m;
    }
    if total_mass <= 0.0 {
        return;
    }
    x_cm /= total_mass;
    v_cm /= total_mass;

    let mut l = Vec3::ZERO;
    let mut inertia = Mat3::ZERO;
    for &id in ids {
        let p = &particles[id.index()];
        let r = p.x - x_cm;
        l += r.cross(p.v * p.m);
        inertia += point_inertia(p.m, r);
    }
    let omega = try_inverse(inertia).map_or(Vec3::ZERO, |inv| inv * l);

    for &id in ids {
        let p = &mut particles[id.index()];
        if p.pinned {
            continue;
        }
        let r = p.x - x_cm;
        let dv = (v_cm + omega.cross(r) - p.v) * coeff;
        p.v += dv;
    }
}
