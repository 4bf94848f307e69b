//! Integration tests for velum-io.

use std::path::PathBuf;

use velum_io::obj::{parse_obj, write_obj};
use velum_io::scene::{BodySpec, MeshSource, SceneDescription};
use velum_io::validator::validate_scene;
use velum_io::{load_mesh, save_mesh, StateSnapshot};
use velum_math::Vec3;
use velum_mesh::generators::quad_grid;
use velum_types::{ParticleId, VelumError};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("velum-io-{}-{name}", std::process::id()))
}

// ─── OBJ Tests ────────────────────────────────────────────────

#[test]
fn obj_triangle() {
    let desc = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    assert_eq!(desc.vertex_count(), 3);
    assert_eq!(desc.indices, vec![[0, 1, 2]]);
    assert!((desc.positions[1].x - 1.0).abs() < 1e-12);
}

#[test]
fn obj_quad_is_fan_triangulated() {
    let src = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
s off
f 1/1/1 2/2/1 3/3/1 4/4/1
";
    let desc = parse_obj(src).unwrap();
    assert_eq!(desc.triangle_count(), 2);
    assert_eq!(desc.indices, vec![[0, 1, 2], [0, 2, 3]]);
}

#[test]
fn obj_pentagon_fans_into_three() {
    let src = "v 0 0 0\nv 1 0 0\nv 1.5 1 0\nv 0.5 2 0\nv -0.5 1 0\nf 1 2 3 4 5\n";
    let desc = parse_obj(src).unwrap();
    assert_eq!(desc.indices, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
}

#[test]
fn obj_negative_indices_and_comments() {
    let src = "v 0 0 0 # origin\nv 1 0 0\nv 0 1 0\nf -3//1 -2//1 -1//1\n";
    let desc = parse_obj(src).unwrap();
    assert_eq!(desc.indices, vec![[0, 1, 2]]);
}

#[test]
fn obj_bad_coordinate_reports_line() {
    let err = parse_obj("v 0 0 0\nv 1 zero 0\n").unwrap_err();
    match err {
        VelumError::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn obj_short_face_reports_line() {
    let err = parse_obj("v 0 0 0\nv 1 0 0\n\nf 1 2\n").unwrap_err();
    assert!(matches!(err, VelumError::Parse { line: 4, .. }));
}

#[test]
fn obj_zero_index_rejected() {
    let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
    assert!(matches!(err, VelumError::Parse { line: 4, .. }));
}

#[test]
fn obj_out_of_range_index_is_invalid_mesh() {
    let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap_err();
    assert!(matches!(err, VelumError::InvalidMesh(_)));
}

#[test]
fn write_then_parse_obj() {
    let grid = quad_grid(3, 2, 1.5, 1.0);
    let parsed = parse_obj(&write_obj(&grid)).unwrap();
    assert_eq!(parsed.indices, grid.indices);
    for (a, b) in parsed.positions.iter().zip(&grid.positions) {
        assert!((*a - *b).length() < 1e-12);
    }
}

// ─── Loader Tests ─────────────────────────────────────────────

#[test]
fn load_obj_and_json_files() {
    let grid = quad_grid(2, 2, 1.0, 1.0);

    let obj = temp_path("grid.obj");
    save_mesh(&obj, &grid).unwrap();
    assert_eq!(load_mesh(&obj).unwrap().indices, grid.indices);

    let json = temp_path("grid.json");
    save_mesh(&json, &grid).unwrap();
    let loaded = load_mesh(&json).unwrap();
    assert_eq!(loaded.indices, grid.indices);
    for (a, b) in loaded.positions.iter().zip(&grid.positions) {
        assert!((*a - *b).length() < 1e-12);
    }

    let _ = std::fs::remove_file(obj);
    let _ = std::fs::remove_file(json);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_mesh(temp_path("does-not-exist.obj")).unwrap_err();
    assert!(matches!(err, VelumError::Io(_)));
}

#[test]
fn unknown_extension_rejected() {
    let err = load_mesh("mesh.stl").unwrap_err();
    assert!(matches!(err, VelumError::InvalidConfig(_)));
}

#[test]
fn malformed_json_is_serialization_error() {
    let path = temp_path("broken.json");
    std::fs::write(&path, "{ \"positions\": [").unwrap();
    let err = load_mesh(&path).unwrap_err();
    assert!(matches!(err, VelumError::Serialization(_)));
    let _ = std::fs::remove_file(path);
}

// ─── Scene Tests ──────────────────────────────────────────────

const HANGING_SHEET: &str = r#"
duration = 0.5

[config]
solver_iterations = 8

[[bodies]]
pins = [0, 4]
mesh = { kind = "grid", cols = 4, rows = 4, width = 1.0, height = 1.0 }

[[obstacles]]
offset = [0.0, -2.0, 0.0]
mesh = { kind = "cuboid", low = [-1.0, -0.5, -1.0], high = [1.0, 0.0, 1.0] }
"#;

#[test]
fn scene_parses_from_toml() {
    let scene = SceneDescription::from_toml_str(HANGING_SHEET).unwrap();
    assert!((scene.duration - 0.5).abs() < 1e-12);
    assert_eq!(scene.config.solver_iterations, 8);
    assert!((scene.config.stretch_stiffness - 0.8).abs() < 1e-12);
    assert_eq!(scene.bodies.len(), 1);
    assert_eq!(scene.bodies[0].pins, vec![0, 4]);
    assert!(scene.bodies[0].constraints);
    assert_eq!(
        scene.bodies[0].mesh,
        MeshSource::Grid {
            cols: 4,
            rows: 4,
            width: 1.0,
            height: 1.0
        }
    );
    assert_eq!(scene.obstacles.len(), 1);
}

#[test]
fn scene_toml_round_trip() {
    let scene = SceneDescription::from_toml_str(HANGING_SHEET).unwrap();
    let text = scene.to_toml_string().unwrap();
    let back = SceneDescription::from_toml_str(&text).unwrap();
    assert_eq!(back, scene);
}

#[test]
fn frame_count_covers_duration() {
    let mut scene = SceneDescription::from_toml_str(HANGING_SHEET).unwrap();
    scene.duration = 2.0;
    scene.config.dt = 1.0 / 60.0;
    assert_eq!(scene.frame_count(), 120);
}

#[test]
fn scene_builds_pinned_system() {
    let scene = SceneDescription::from_toml_str(HANGING_SHEET).unwrap();
    let mut built = scene.build().unwrap();
    assert_eq!(built.bodies.len(), 1);
    assert_eq!(built.obstacles.len(), 1);
    assert!(!built.system.forces().is_empty());
    assert!(!built.system.constraints().is_empty());

    let body = built.system.mesh(built.bodies[0]).unwrap().clone();
    let pinned: Vec<ParticleId> = vec![body.vertices[0], body.vertices[4]];
    let before: Vec<Vec3> = pinned
        .iter()
        .map(|&id| built.system.particle(id).unwrap().x)
        .collect();

    for _ in 0..10 {
        built.system.step().unwrap();
    }

    for (&id, &x) in pinned.iter().zip(&before) {
        assert!((built.system.particle(id).unwrap().x - x).length() < 1e-12);
    }
    let free = built.system.particle(body.vertices[12]).unwrap();
    assert!(free.x.y < free.x0.y, "unpinned vertex should sag");
}

#[test]
fn scene_mesh_file_resolves_against_scene_dir() {
    let dir = temp_path("scene-dir");
    std::fs::create_dir_all(&dir).unwrap();
    save_mesh(dir.join("sheet.obj"), &quad_grid(2, 2, 1.0, 1.0)).unwrap();
    std::fs::write(
        dir.join("scene.toml"),
        "[[bodies]]\nmesh = { kind = \"file\", path = \"sheet.obj\" }\n",
    )
    .unwrap();

    let scene = SceneDescription::load(dir.join("scene.toml")).unwrap();
    assert_eq!(scene.base_dir, dir);
    let built = scene.build().unwrap();
    assert_eq!(built.system.particles().len(), 9);

    let _ = std::fs::remove_dir_all(dir);
}

// ─── Validator Tests ──────────────────────────────────────────

fn valid_scene() -> SceneDescription {
    SceneDescription::from_toml_str(HANGING_SHEET).unwrap()
}

#[test]
fn valid_scene_passes() {
    assert!(validate_scene(&valid_scene()).is_ok());
}

#[test]
fn pin_out_of_range_rejected() {
    let mut scene = valid_scene();
    scene.bodies[0].pins.push(25);
    assert!(matches!(
        validate_scene(&scene),
        Err(VelumError::InvalidConfig(_))
    ));
}

#[test]
fn empty_scene_rejected() {
    let mut scene = valid_scene();
    scene.bodies.clear();
    assert!(validate_scene(&scene).is_err());
}

#[test]
fn bad_config_rejected() {
    let mut scene = valid_scene();
    scene.config.dt = -0.01;
    assert!(validate_scene(&scene).is_err());
    assert!(scene.build().is_err());
}

#[test]
fn non_positive_duration_rejected() {
    let mut scene = valid_scene();
    scene.duration = 0.0;
    assert!(validate_scene(&scene).is_err());
}

#[test]
fn bad_generators_rejected() {
    let mut scene = valid_scene();
    scene.bodies.push(BodySpec {
        mesh: MeshSource::Sphere {
            radius: -1.0,
            stacks: 8,
            slices: 8,
        },
        offset: [0.0; 3],
        density: None,
        pins: Vec::new(),
        constraints: true,
    });
    assert!(validate_scene(&scene).is_err());

    let mut scene = valid_scene();
    scene.obstacles[0].mesh = MeshSource::Cuboid {
        low: [0.0; 3],
        high: [1.0, 0.0, 1.0],
    };
    assert!(validate_scene(&scene).is_err());
}

#[test]
fn missing_body_file_is_io_error() {
    let mut scene = valid_scene();
    scene.bodies[0].mesh = MeshSource::File {
        path: temp_path("nope.obj"),
    };
    assert!(matches!(validate_scene(&scene), Err(VelumError::Io(_))));
}

// ─── Snapshot Tests ───────────────────────────────────────────

#[test]
fn snapshot_restore_reproduces_trajectory() {
    let scene = valid_scene();
    let mut built = scene.build().unwrap();
    for _ in 0..5 {
        built.system.step().unwrap();
    }
    let snap = StateSnapshot::capture(&built.system);
    assert_eq!(snap.frame, 5);
    assert_eq!(snap.particle_count(), built.system.particles().len());

    for _ in 0..5 {
        built.system.step().unwrap();
    }
    let expected: Vec<Vec3> = built.system.particles().iter().map(|p| p.x).collect();

    let bytes = snap.to_bytes().unwrap();
    let decoded = StateSnapshot::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, snap);

    decoded.restore(&mut built.system).unwrap();
    assert_eq!(built.system.frame(), 5);
    for _ in 0..5 {
        built.system.step().unwrap();
    }
    for (p, x) in built.system.particles().iter().zip(&expected) {
        assert!((p.x - *x).length() < 1e-9);
    }
}

#[test]
fn snapshot_file_round_trip() {
    let built = valid_scene().build().unwrap();
    let snap = StateSnapshot::capture(&built.system);
    let path = temp_path("state.bin");
    snap.save(&path).unwrap();
    assert_eq!(StateSnapshot::load(&path).unwrap(), snap);
    let _ = std::fs::remove_file(path);
}

#[test]
fn snapshot_size_mismatch_rejected() {
    let built = valid_scene().build().unwrap();
    let mut snap = StateSnapshot::capture(&built.system);
    snap.positions.pop();
    let mut system = valid_scene().build().unwrap().system;
    assert!(snap.restore(&mut system).is_err());
}

#[test]
fn garbage_snapshot_rejected() {
    assert!(matches!(
        StateSnapshot::from_bytes(&[1, 2, 3]),
        Err(VelumError::Serialization(_))
    ));
}
