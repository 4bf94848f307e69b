//! Integration tests for velum-types.

use velum_types::{EdgeId, MeshId, ParticleId, TriangleId, VelumError};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn particle_id_index() {
    let id = ParticleId(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn triangle_id_index() {
    let id = TriangleId(7);
    assert_eq!(id.index(), 7);
}

#[test]
fn ids_convert_from_raw() {
    assert_eq!(EdgeId::from(3), EdgeId(3));
    assert_eq!(MeshId::from(1).index(), 1);
}

#[test]
fn ids_are_serializable() {
    let id = ParticleId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ParticleId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = VelumError::InvalidMesh("edge 4 has zero rest length".into());
    assert!(err.to_string().contains("zero rest length"));
}

#[test]
fn parse_error_display() {
    let err = VelumError::Parse {
        line: 12,
        message: "face references vertex 9".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("line 12"));
    assert!(msg.contains("vertex 9"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "cloth.obj");
    let err: VelumError = io.into();
    assert!(matches!(err, VelumError::Io(_)));
}
