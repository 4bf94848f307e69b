//! Procedural mesh generators for scenes, benchmarks and tests.
//!
//! These generators produce deterministic, resolution-configurable
//! descriptions with counter-clockwise winding seen from outside.

use velum_math::Vec3;
use velum_types::Scalar;

use crate::description::MeshDescription;

/// Generates a flat rectangular quad grid in the XY plane facing +Z.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]` in Y,
/// centered at the origin at Z=0. Vertex rows run top to bottom.
///
/// # Arguments
/// - `cols`: Number of quads along X (vertex count = cols + 1).
/// - `rows`: Number of quads along Y (vertex count = rows + 1).
/// - `width`: Total width in meters.
/// - `height`: Total height in meters.
///
/// # Example
/// ```
/// use velum_mesh::generators::quad_grid;
/// let mesh = quad_grid(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);  // 3×3 vertices
/// assert_eq!(mesh.triangle_count(), 8); // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid(cols: usize, rows: usize, width: Scalar, height: Scalar) -> MeshDescription {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let mut mesh = MeshDescription::with_capacity(verts_x * verts_y, cols * rows * 2);

    let half_w = width / 2.0;
    let half_h = height / 2.0;

    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as Scalar / cols as Scalar;
            let v = j as Scalar / rows as Scalar;
            mesh.positions
                .push(Vec3::new(-half_w + u * width, half_h - v * height, 0.0));
        }
    }

    for j in 0..rows {
        for i in 0..cols {
            let top_left = (j * verts_x + i) as u32;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x as u32;
            let bot_right = bot_left + 1;

            mesh.indices.push([top_left, bot_left, top_right]);
            mesh.indices.push([top_right, bot_left, bot_right]);
        }
    }

    mesh
}

/// Generates a closed UV sphere centered at the origin.
///
/// Unlike a texture-mapped sphere there is no seam: each pole is a single
/// vertex and longitude wraps around, so the surface is watertight and can
/// carry a pressure constraint.
///
/// # Arguments
/// - `radius`: Sphere radius in meters.
/// - `stacks`: Number of latitude bands (at least 2).
/// - `slices`: Number of longitude divisions (at least 3).
pub fn uv_sphere(radius: Scalar, stacks: usize, slices: usize) -> MeshDescription {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let ring_count = stacks - 1;
    let mut mesh = MeshDescription::with_capacity(ring_count * slices + 2, 2 * slices * ring_count);

    let top = 0u32;
    mesh.positions.push(Vec3::new(0.0, radius, 0.0));
    for i in 1..stacks {
        let phi = std::f64::consts::PI * i as Scalar / stacks as Scalar;
        for j in 0..slices {
            let theta = 2.0 * std::f64::consts::PI * j as Scalar / slices as Scalar;
            mesh.positions.push(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }
    let bottom = mesh.positions.len() as u32;
    mesh.positions.push(Vec3::new(0.0, -radius, 0.0));

    let ring = |i: usize, j: usize| (1 + i * slices + j % slices) as u32;

    for j in 0..slices {
        mesh.indices.push([top, ring(0, j + 1), ring(0, j)]);
    }
    for i in 0..ring_count - 1 {
        for j in 0..slices {
            let a0 = ring(i, j);
            let a1 = ring(i, j + 1);
            let b0 = ring(i + 1, j);
            let b1 = ring(i + 1, j + 1);
            mesh.indices.push([a0, a1, b0]);
            mesh.indices.push([a1, b1, b0]);
        }
    }
    for j in 0..slices {
        mesh.indices.push([ring(ring_count - 1, j), ring(ring_count - 1, j + 1), bottom]);
    }

    mesh
}

/// Generates an axis-aligned box spanning `low` to `high`.
///
/// Eight shared corners, twelve outward-facing triangles.
pub fn cuboid(low: Vec3, high: Vec3) -> MeshDescription {
    let positions = vec![
        low,
        Vec3::new(low.x, low.y, high.z),
        Vec3::new(low.x, high.y, low.z),
        Vec3::new(low.x, high.y, high.z),
        Vec3::new(high.x, low.y, low.z),
        Vec3::new(high.x, low.y, high.z),
        Vec3::new(high.x, high.y, low.z),
        high,
    ];
    let indices = vec![
        [0, 1, 2],
        [2, 1, 3],
        [0, 4, 5],
        [0, 5, 1],
        [0, 2, 4],
        [2, 6, 4],
        [1, 5, 7],
        [1, 7, 3],
        [2, 7, 6],
        [2, 3, 7],
        [4, 7, 5],
        [4, 6, 7],
    ];
    MeshDescription::new(positions, indices)
}
