//! Mesh files on disk, dispatched by extension (`.obj` or `.json`).

use std::fs;
use std::path::Path;

use velum_mesh::MeshDescription;
use velum_types::{VelumError, VelumResult};

use crate::obj::{parse_obj, write_obj};

enum Format {
    Obj,
    Json,
}

fn format_of(path: &Path) -> VelumResult<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("obj") => Ok(Format::Obj),
        Some("json") => Ok(Format::Json),
        _ => Err(VelumError::InvalidConfig(format!(
            "unsupported mesh file '{}': expected .obj or .json",
            path.display()
        ))),
    }
}

/// Loads and validates a mesh description from an OBJ or JSON file.
pub fn load_mesh(path: impl AsRef<Path>) -> VelumResult<MeshDescription> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let text = fs::read_to_string(path)?;
    let desc = match format {
        Format::Obj => parse_obj(&text)?,
        Format::Json => {
            let desc: MeshDescription = serde_json::from_str(&text)
                .map_err(|e| VelumError::Serialization(format!("{}: {e}", path.display())))?;
            desc.validate()?;
            desc
        }
    };
    tracing::info!(
        path = %path.display(),
        vertices = desc.vertex_count(),
        triangles = desc.triangle_count(),
        "mesh loaded"
    );
    Ok(desc)
}

/// Writes a mesh description as OBJ or JSON, chosen by extension.
pub fn save_mesh(path: impl AsRef<Path>, desc: &MeshDescription) -> VelumResult<()> {
    let path = path.as_ref();
    let text = match format_of(path)? {
        Format::Obj => write_obj(desc),
        Format::Json => serde_json::to_string_pretty(desc)
            .map_err(|e| VelumError::Serialization(e.to_string()))?,
    };
    fs::write(path, text)?;
    Ok(())
}
