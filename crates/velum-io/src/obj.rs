//! Wavefront OBJ subset.
//!
//! Reads `v` and `f` records. Polygons are fan-triangulated around their
//! first corner; `v/vt/vn` corner suffixes and every other record type
//! (`vt`, `vn`, `o`, `g`, `s`, `usemtl`, ...) are ignored.

use std::fmt::Write;

use velum_math::Vec3;
use velum_mesh::MeshDescription;
use velum_types::{Scalar, VelumError, VelumResult};

/// Parses OBJ source text into a validated mesh description.
pub fn parse_obj(source: &str) -> VelumResult<MeshDescription> {
    let mut desc = MeshDescription::default();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        let mut fields = content.split_whitespace();

        match fields.next() {
            Some("v") => {
                let mut xyz = [0.0; 3];
                for c in &mut xyz {
                    let field = fields.next().ok_or_else(|| VelumError::Parse {
                        line,
                        message: "vertex needs three coordinates".into(),
                    })?;
                    *c = field.parse::<Scalar>().map_err(|e| VelumError::Parse {
                        line,
                        message: format!("bad coordinate '{field}': {e}"),
                    })?;
                }
                desc.positions.push(Vec3::from_array(xyz));
            }
            Some("f") => {
                let corners = fields
                    .map(|field| corner_index(field, desc.vertex_count(), line))
                    .collect::<VelumResult<Vec<u32>>>()?;
                if corners.len() < 3 {
                    return Err(VelumError::Parse {
                        line,
                        message: format!("face needs at least 3 corners, got {}", corners.len()),
                    });
                }
                for k in 1..corners.len() - 1 {
                    desc.indices.push([corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }

    desc.validate()?;
    tracing::debug!(
        vertices = desc.vertex_count(),
        triangles = desc.triangle_count(),
        "parsed OBJ"
    );
    Ok(desc)
}

/// Resolves one face corner (`7`, `7/2`, `7//3`, `-1`, ...) to a 0-based
/// vertex index. Negative indices count back from the vertices read so far.
fn corner_index(field: &str, vertices_so_far: usize, line: usize) -> VelumResult<u32> {
    let head = field.split('/').next().unwrap_or_default();
    let raw: i64 = head.parse().map_err(|e| VelumError::Parse {
        line,
        message: format!("bad face index '{field}': {e}"),
    })?;

    let index = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(vertices_so_far as i64 + r),
    };
    match index {
        Some(idx) if idx >= 0 && idx <= u32::MAX as i64 => Ok(idx as u32),
        _ => Err(VelumError::Parse {
            line,
            message: format!("face index {raw} out of range"),
        }),
    }
}

/// Formats a description as OBJ text with 1-based indices.
pub fn write_obj(desc: &MeshDescription) -> String {
    let mut out = String::with_capacity(32 * (desc.vertex_count() + desc.triangle_count()));
    for p in &desc.positions {
        let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
    }
    for [a, b, c] in &desc.indices {
        let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
    }
    out
}
