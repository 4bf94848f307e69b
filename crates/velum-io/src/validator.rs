//! Scene validation.
//!
//! Checks a scene before the solver receives it, catching data-level errors
//! early with clear diagnostics.

use velum_types::{VelumError, VelumResult};

use crate::scene::SceneDescription;

/// Validates a complete scene description.
///
/// Checks:
/// - Solver configuration ranges
/// - Duration is positive
/// - At least one deformable body
/// - Every mesh source resolves to a valid mesh
/// - Pins and densities of each body
pub fn validate_scene(scene: &SceneDescription) -> VelumResult<()> {
    scene.config.validate()?;

    if !(scene.duration.is_finite() && scene.duration > 0.0) {
        return Err(VelumError::InvalidConfig(format!(
            "duration must be positive, got {}",
            scene.duration
        )));
    }
    if scene.bodies.is_empty() {
        return Err(VelumError::InvalidConfig(
            "scene has no deformable bodies".into(),
        ));
    }

    for (b, body) in scene.bodies.iter().enumerate() {
        let desc = body
            .mesh
            .resolve(&scene.base_dir)
            .map_err(|e| with_context(e, &format!("body {b}")))?;
        if let Some(density) = body.density {
            if !(density.is_finite() && density > 0.0) {
                return Err(VelumError::InvalidConfig(format!(
                    "body {b}: density must be positive, got {density}"
                )));
            }
        }
        if let Some(&pin) = body
            .pins
            .iter()
            .find(|&&p| p as usize >= desc.vertex_count())
        {
            return Err(VelumError::InvalidConfig(format!(
                "body {b}: pin {pin} out of range (vertex count: {})",
                desc.vertex_count()
            )));
        }
        if body.offset.iter().any(|c| !c.is_finite()) {
            return Err(VelumError::InvalidConfig(format!(
                "body {b}: offset must be finite"
            )));
        }
    }

    for (o, obstacle) in scene.obstacles.iter().enumerate() {
        obstacle
            .mesh
            .resolve(&scene.base_dir)
            .map_err(|e| with_context(e, &format!("obstacle {o}")))?;
        if obstacle.offset.iter().any(|c| !c.is_finite()) {
            return Err(VelumError::InvalidConfig(format!(
                "obstacle {o}: offset must be finite"
            )));
        }
    }

    Ok(())
}

/// Prefixes string-carrying errors with the item they came from.
fn with_context(err: VelumError, what: &str) -> VelumError {
    match err {
        VelumError::InvalidMesh(msg) => VelumError::InvalidMesh(format!("{what}: {msg}")),
        VelumError::InvalidConfig(msg) => VelumError::InvalidConfig(format!("{what}: {msg}")),
        other => other,
    }
}
