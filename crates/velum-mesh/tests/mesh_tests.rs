//! Integration tests for velum-mesh.

use velum_math::Vec3;
use velum_mesh::generators::{cuboid, quad_grid, uv_sphere};
use velum_mesh::normals::{description_normals, vertex_normals};
use velum_mesh::topology::Topology;
use velum_mesh::{Mesh, MeshDescription, Particle};
use velum_types::ParticleId;

const EPS: f64 = 1e-9;

fn make_single_triangle() -> MeshDescription {
    MeshDescription::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
}

fn instantiate(desc: &MeshDescription, density: f64) -> (Vec<Particle>, Mesh) {
    let particles: Vec<Particle> = desc
        .positions
        .iter()
        .enumerate()
        .map(|(i, &p)| Particle::new(ParticleId(i as u32), p, 1.0))
        .collect();
    let ids: Vec<ParticleId> = particles.iter().map(|p| p.id).collect();
    let mesh = Mesh::from_description(desc, &ids, density).unwrap();
    (particles, mesh)
}

// ─── MeshDescription Tests ────────────────────────────────────

#[test]
fn description_counts() {
    let desc = make_single_triangle();
    assert_eq!(desc.vertex_count(), 3);
    assert_eq!(desc.triangle_count(), 1);
    assert_eq!(desc.triangle(0), [0, 1, 2]);
}

#[test]
fn validate_catches_oob_index() {
    let mut desc = make_single_triangle();
    desc.indices[0][2] = 99;
    assert!(desc.validate().is_err());
}

#[test]
fn validate_catches_repeated_vertex() {
    let mut desc = make_single_triangle();
    desc.indices[0] = [0, 0, 1];
    assert!(desc.validate().is_err());
}

#[test]
fn validate_catches_nan_position() {
    let mut desc = make_single_triangle();
    desc.positions[1].x = f64::NAN;
    assert!(desc.validate().is_err());
}

#[test]
fn from_interleaved_rejects_ragged_input() {
    assert!(MeshDescription::from_interleaved(&[0.0, 1.0], &[0, 1, 2]).is_err());
    assert!(MeshDescription::from_interleaved(&[0.0; 9], &[0, 1]).is_err());
}

#[test]
fn translate_moves_every_vertex() {
    let mut desc = make_single_triangle();
    desc.translate(Vec3::new(0.0, 2.0, 0.0));
    assert!((desc.position(0).y - 2.0).abs() < EPS);
    assert!((desc.position(2).y - 3.0).abs() < EPS);
}

#[test]
fn description_serde_roundtrip() {
    let desc = quad_grid(2, 2, 1.0, 1.0);
    let json = serde_json::to_string(&desc).unwrap();
    let back: MeshDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(desc, back);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let desc = quad_grid(10, 10, 1.0, 1.0);
    assert_eq!(desc.vertex_count(), 121);
    assert_eq!(desc.triangle_count(), 200);
    assert!(desc.validate().is_ok());
}

#[test]
fn quad_grid_faces_positive_z() {
    let desc = quad_grid(3, 2, 1.0, 1.0);
    for n in description_normals(&desc) {
        assert!((n - Vec3::Z).length() < EPS);
    }
}

#[test]
fn quad_grid_is_centered() {
    let desc = quad_grid(4, 4, 2.0, 1.0);
    let sum: Vec3 = desc.positions.iter().copied().sum();
    let centroid = sum / desc.vertex_count() as f64;
    assert!(centroid.length() < EPS);
}

#[test]
fn uv_sphere_is_watertight() {
    let desc = uv_sphere(1.0, 8, 12);
    assert_eq!(desc.vertex_count(), 7 * 12 + 2);
    assert_eq!(desc.triangle_count(), 2 * 12 * 7);
    assert!(desc.validate().is_ok());
    assert!(Topology::build(&desc).is_closed());
}

#[test]
fn uv_sphere_vertices_on_surface() {
    let desc = uv_sphere(2.0, 6, 8);
    for p in &desc.positions {
        assert!((p.length() - 2.0).abs() < 1e-9);
    }
}

#[test]
fn cuboid_is_closed_and_outward() {
    let desc = cuboid(Vec3::ZERO, Vec3::ONE);
    assert_eq!(desc.vertex_count(), 8);
    assert_eq!(desc.triangle_count(), 12);
    assert!(Topology::build(&desc).is_closed());

    let centre = Vec3::splat(0.5);
    for &[a, b, c] in &desc.indices {
        let (pa, pb, pc) = (
            desc.position(a as usize),
            desc.position(b as usize),
            desc.position(c as usize),
        );
        let n = (pb - pa).cross(pc - pa);
        let face_centre = (pa + pb + pc) / 3.0;
        assert!(n.dot(face_centre - centre) > 0.0);
    }
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn topology_single_triangle() {
    let topo = Topology::build(&make_single_triangle());
    assert_eq!(topo.edges.len(), 3);
    assert_eq!(topo.boundary_edge_count(), 3);
    assert!(topo.interior_edges.is_empty());
    assert!(!topo.is_closed());
}

#[test]
fn topology_quad_has_one_interior_edge() {
    let desc = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&desc);
    assert_eq!(topo.edges.len(), 5);
    assert_eq!(topo.interior_edges.len(), 1);

    let ie = topo.interior_edges[0];
    assert_eq!([ie.v0, ie.v1], [1, 2]);
    let mut wings = [ie.wing_a, ie.wing_b];
    wings.sort();
    assert_eq!(wings, [0, 3]);
}

#[test]
fn topology_edge_order_is_first_seen() {
    let desc = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&desc);
    // First triangle is [0, 2, 1]
    assert_eq!(topo.edges[0], [0, 2]);
    assert_eq!(topo.edges[1], [1, 2]);
    assert_eq!(topo.edges[2], [0, 1]);
}

// ─── Mesh Tests ───────────────────────────────────────────────

#[test]
fn mesh_rest_lengths_match_geometry() {
    let desc = quad_grid(1, 1, 1.0, 1.0);
    let (_, mesh) = instantiate(&desc, 1.0);
    assert_eq!(mesh.edges.len(), 5);
    let mut lengths: Vec<f64> = mesh.edges.iter().map(|e| e.rest_length).collect();
    lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((lengths[0] - 1.0).abs() < EPS);
    assert!((lengths[4] - 2.0_f64.sqrt()).abs() < EPS);
}

#[test]
fn mesh_boundary_edges_have_one_triangle() {
    let desc = quad_grid(1, 1, 1.0, 1.0);
    let (_, mesh) = instantiate(&desc, 1.0);
    assert_eq!(mesh.edges.iter().filter(|e| e.is_boundary()).count(), 4);
    assert!(!mesh.is_closed());
    assert_eq!(mesh.hinges().len(), 1);
}

#[test]
fn mesh_rejects_mismatched_ids() {
    let desc = make_single_triangle();
    let ids = vec![ParticleId(0), ParticleId(1)];
    assert!(Mesh::from_description(&desc, &ids, 1.0).is_err());
}

#[test]
fn mesh_rejects_zero_length_edge() {
    let desc = MeshDescription::new(
        vec![Vec3::ZERO, Vec3::ZERO, Vec3::Y],
        vec![[0, 1, 2]],
    );
    let ids: Vec<ParticleId> = (0..3).map(ParticleId).collect();
    assert!(Mesh::from_description(&desc, &ids, 1.0).is_err());
}

#[test]
fn unit_cube_rest_volume() {
    let desc = cuboid(Vec3::ZERO, Vec3::ONE);
    let (particles, mesh) = instantiate(&desc, 1.0);
    assert!((mesh.rest_volume() - 1.0).abs() < EPS);
    assert!((mesh.volume(&particles) - 1.0).abs() < EPS);
    assert!((mesh.triple_product_sum(&particles) - 6.0).abs() < EPS);
    assert!(mesh.is_closed());
}

#[test]
fn volume_is_translation_invariant() {
    let mut desc = cuboid(Vec3::ZERO, Vec3::ONE);
    desc.translate(Vec3::new(3.0, -2.0, 5.0));
    let (particles, mesh) = instantiate(&desc, 1.0);
    assert!((mesh.volume(&particles) - 1.0).abs() < 1e-9);
}

#[test]
fn sphere_volume_approaches_analytic() {
    let desc = uv_sphere(1.0, 24, 32);
    let (particles, mesh) = instantiate(&desc, 1.0);
    let analytic = 4.0 / 3.0 * std::f64::consts::PI;
    let v = mesh.volume(&particles);
    assert!(v > 0.0 && v < analytic);
    assert!((v - analytic).abs() / analytic < 0.03);
}

#[test]
fn update_mass_distributes_density() {
    let desc = quad_grid(1, 1, 1.0, 1.0);
    let (mut particles, mesh) = instantiate(&desc, 10.0);
    mesh.update_mass(&mut particles);
    let total: f64 = particles.iter().map(|p| p.m).sum();
    assert!((total - 10.0).abs() < EPS);
    // Corner 1 and 2 touch both triangles.
    assert!((particles[1].m - 10.0 / 3.0).abs() < EPS);
    assert!((particles[0].m - 10.0 / 6.0).abs() < EPS);
}

#[test]
fn update_mass_keeps_previous_for_collapsed_area() {
    let desc = make_single_triangle();
    let (mut particles, mesh) = instantiate(&desc, 10.0);
    particles[2].x = Vec3::new(2.0, 0.0, 0.0);
    mesh.update_mass(&mut particles);
    assert!((particles[0].m - 1.0).abs() < EPS);
}

#[test]
fn center_of_mass_of_unit_cube() {
    let desc = cuboid(Vec3::ZERO, Vec3::ONE);
    let (particles, mesh) = instantiate(&desc, 1.0);
    assert!((mesh.center_of_mass(&particles) - Vec3::splat(0.5)).length() < EPS);
}

#[test]
fn triangle_opposite_vertex() {
    let desc = make_single_triangle();
    let (_, mesh) = instantiate(&desc, 1.0);
    let t = mesh.triangles[0];
    assert_eq!(t.opposite_vertex(ParticleId(0), ParticleId(2)), ParticleId(1));
    assert!(t.contains(ParticleId(2)));
    assert!(!t.contains(ParticleId(7)));
}

#[test]
fn triangle_ray_hits_plane() {
    let desc = make_single_triangle();
    let (particles, mesh) = instantiate(&desc, 1.0);
    let hit = mesh.triangles[0]
        .intersect_ray(&particles, Vec3::new(0.2, 0.2, 1.0), Vec3::new(0.2, 0.2, 0.5))
        .unwrap();
    assert!((hit - Vec3::new(0.2, 0.2, 0.0)).length() < EPS);
}

// ─── Normal Tests ─────────────────────────────────────────────

#[test]
fn vertex_normals_follow_deformation() {
    let desc = make_single_triangle();
    let (mut particles, mesh) = instantiate(&desc, 1.0);
    let normals = vertex_normals(&mesh, &particles);
    assert!((normals[0] - Vec3::Z).length() < EPS);

    // Rotate the triangle into the XZ plane.
    particles[2].x = Vec3::new(0.0, 0.0, 1.0);
    let normals = vertex_normals(&mesh, &particles);
    assert!((normals[0] + Vec3::Y).length() < EPS);
}

#[test]
fn sphere_normals_point_outward() {
    let desc = uv_sphere(1.0, 8, 12);
    let normals = description_normals(&desc);
    for (p, n) in desc.positions.iter().zip(&normals) {
        assert!(p.normalize().dot(*n) > 0.9);
    }
}

// ─── Particle Tests ───────────────────────────────────────────

#[test]
fn particle_pending_changes_apply_once() {
    let mut p = Particle::new(ParticleId(0), Vec3::ZERO, 2.0);
    p.add_position(Vec3::X);
    p.add_velocity(Vec3::Y);
    p.add_force(Vec3::Z);
    assert!(p.has_pending_changes());
    p.apply_changes();
    p.apply_changes();
    assert!((p.x - Vec3::X).length() < EPS);
    assert!((p.v - Vec3::Y).length() < EPS);
    assert!((p.f - Vec3::Z).length() < EPS);
    assert!(!p.has_pending_changes());
}

#[test]
fn particle_inv_mass_zero_when_pinned() {
    let mut p = Particle::new(ParticleId(0), Vec3::ZERO, 2.0);
    assert!((p.inv_mass() - 0.5).abs() < EPS);
    p.pinned = true;
    assert_eq!(p.inv_mass(), 0.0);
    assert_eq!(p.kinetic_energy(), 0.0);
}

#[test]
fn particle_reset_restores_rest_state() {
    let mut p = Particle::new(ParticleId(3), Vec3::new(1.0, 2.0, 3.0), 1.0);
    p.x = Vec3::ZERO;
    p.v = Vec3::ONE;
    p.pinned = true;
    p.add_position(Vec3::X);
    p.reset();
    assert!((p.x - Vec3::new(1.0, 2.0, 3.0)).length() < EPS);
    assert_eq!(p.v, Vec3::ZERO);
    assert!(!p.pinned);
    assert!(!p.has_pending_changes());
}

#[test]
fn describe_reflects_current_positions() {
    let desc = quad_grid(2, 1, 2.0, 1.0);
    let (mut particles, mesh) = instantiate(&desc, 1.0);
    particles[3].x += Vec3::new(0.0, 0.0, 0.5);

    let out = mesh.describe(&particles);
    assert_eq!(out.indices, desc.indices);
    assert!((out.positions[3].z - 0.5).abs() < 1e-12);
    assert!((out.positions[0] - desc.positions[0]).length() < 1e-12);
}
