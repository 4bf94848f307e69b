//! Integration tests for velum-bench.

use velum_bench::metrics::BenchmarkMetrics;
use velum_bench::runner::{max_stretch_error, BenchmarkRunner};
use velum_bench::scenarios::{Scenario, ScenarioKind};
use velum_telemetry::{EventBus, EventKind, VecSink};

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn hanging_sheet_setup() {
    let s = Scenario::hanging_sheet();
    assert_eq!(s.kind, ScenarioKind::HangingSheet);
    assert_eq!(s.cloth.vertex_count(), 441); // 21×21
    assert_eq!(s.cloth.triangle_count(), 800); // 20×20×2
    assert_eq!(s.pins.len(), 21);
    assert!(s.obstacle.is_none());
}

#[test]
fn drape_scenarios_have_obstacles() {
    assert!(Scenario::cloth_on_cube().obstacle.is_some());
    assert!(Scenario::sphere_drape().obstacle.is_some());
    assert!(Scenario::sphere_drape().pins.is_empty());
}

#[test]
fn flat_cloth_lies_above_obstacle() {
    let s = Scenario::cloth_on_cube();
    assert!(s.cloth.positions.iter().all(|p| (p.y - 0.8).abs() < 1e-12));
}

#[test]
fn all_scenarios() {
    assert_eq!(ScenarioKind::all().len(), 4);
    for &kind in ScenarioKind::all() {
        assert_eq!(ScenarioKind::from_name(kind.name()), Some(kind));
        assert_eq!(Scenario::from_kind(kind).kind, kind);
    }
    assert_eq!(ScenarioKind::from_name("nope"), None);
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn setup_pins_and_constraints() {
    let s = Scenario::hanging_sheet();
    let (system, cloth) = BenchmarkRunner::setup(&s).unwrap();
    let mesh = system.mesh(cloth).unwrap();
    let pinned = mesh
        .vertices
        .iter()
        .filter(|id| system.particles()[id.index()].pinned)
        .count();
    assert_eq!(pinned, 21);
    assert!(max_stretch_error(mesh, system.particles()) < 1e-12);
}

#[test]
fn run_hanging_sheet() {
    let mut scenario = Scenario::hanging_sheet();
    scenario.frames = 5;
    let metrics = BenchmarkRunner::run(&scenario).unwrap();

    assert_eq!(metrics.scenario, "hanging_sheet");
    assert_eq!(metrics.frames, 5);
    assert_eq!(metrics.particle_count, 441);
    assert!((metrics.avg_iterations - 10.0).abs() < 1e-12);
    assert!(metrics.max_displacement > 0.0); // Gravity should cause displacement
    assert!(metrics.volume_ratio.is_none());
    assert!(metrics.min_step_time <= metrics.max_step_time);
}

#[test]
fn balloon_inflates() {
    let mut scenario = Scenario::balloon();
    scenario.frames = 10;
    let metrics = BenchmarkRunner::run(&scenario).unwrap();
    let ratio = metrics.volume_ratio.unwrap();
    assert!(ratio.is_finite());
    assert!(ratio > 1.1, "volume ratio {ratio}");
    assert!(ratio < 3.0, "volume ratio {ratio}");
}

#[test]
fn cloth_hits_cube() {
    let mut scenario = Scenario::cloth_on_cube();
    scenario.frames = 60;
    let metrics = BenchmarkRunner::run(&scenario).unwrap();
    assert!(metrics.total_collisions > 0);
    assert_eq!(metrics.particle_count, 441 + 8);
}

#[test]
fn cloth_hits_sphere() {
    let mut scenario = Scenario::sphere_drape();
    scenario.frames = 60;
    let metrics = BenchmarkRunner::run(&scenario).unwrap();
    assert!(metrics.total_collisions > 0);
}

#[test]
fn run_emits_frame_events() {
    let mut scenario = Scenario::hanging_sheet();
    scenario.frames = 3;

    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    BenchmarkRunner::run_with_bus(&scenario, &mut bus).unwrap();

    let events = sink.events();
    let begins = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::FrameBegin { .. }))
        .count();
    let ends = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::FrameEnd { .. }))
        .count();
    assert_eq!(begins, 3);
    assert_eq!(ends, 3);
    assert_eq!(events.first().map(|e| e.frame), Some(0));
    assert_eq!(events.last().map(|e| e.kind_name()), Some("custom"));
    assert!(events.iter().any(|e| matches!(
        e.kind,
        EventKind::Relaxation {
            iterations: 10,
            max_stretch_error: Some(_),
        }
    )));
    assert_eq!(bus.totals().frames, 3);
    assert_eq!(bus.totals().sweeps, 30);
}

// ─── Metrics Tests ────────────────────────────────────────────

#[test]
fn csv_format() {
    let mut scenario = Scenario::balloon();
    scenario.frames = 2;
    let m = BenchmarkRunner::run(&scenario).unwrap();

    let csv = BenchmarkMetrics::to_csv(&[m.clone(), m]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    let columns = lines[0].split(',').count();
    assert_eq!(columns, 15);
    for row in &lines[1..] {
        assert_eq!(row.split(',').count(), columns);
        assert!(row.starts_with("balloon,"));
    }
}

#[test]
fn json_export() {
    let mut scenario = Scenario::hanging_sheet();
    scenario.frames = 1;
    let m = BenchmarkRunner::run(&scenario).unwrap();
    let json = BenchmarkMetrics::to_json(&[m]).unwrap();
    let back: Vec<BenchmarkMetrics> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].scenario, "hanging_sheet");
}
