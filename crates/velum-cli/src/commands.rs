//! CLI command implementations.

use std::error::Error;
use std::path::{Path, PathBuf};

use velum_bench::metrics::BenchmarkMetrics;
use velum_bench::runner::BenchmarkRunner;
use velum_bench::scenarios::{Scenario, ScenarioKind};
use velum_io::{load_mesh, save_mesh, validate_scene, SceneDescription, StateSnapshot};
use velum_mesh::MeshDescription;
use velum_solver::{ParticleSystem, SimulationConfig};
use velum_telemetry::{EventBus, FrameSample, TracingSink};
use velum_types::MeshId;

type CommandResult = Result<(), Box<dyn Error>>;

/// Options of `velum simulate`.
pub struct SimulateArgs {
    pub scene: PathBuf,
    pub frames: Option<u64>,
    pub output: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub resume: Option<PathBuf>,
    pub events: bool,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Concatenates the current geometry of several meshes into one description.
fn merge_bodies(system: &ParticleSystem, bodies: &[MeshId]) -> Result<MeshDescription, Box<dyn Error>> {
    let mut merged = MeshDescription::default();
    for &id in bodies {
        let part = system.mesh(id)?.describe(system.particles());
        let base = merged.vertex_count() as u32;
        merged.positions.extend(part.positions);
        merged
            .indices
            .extend(part.indices.iter().map(|[a, b, c]| [a + base, b + base, c + base]));
    }
    Ok(merged)
}

/// Run a simulation from a scene file.
pub fn simulate(args: &SimulateArgs) -> CommandResult {
    println!("Velum Simulation");
    println!("────────────────");
    println!("Scene: {}", args.scene.display());
    println!();

    let scene = SceneDescription::load(&args.scene)?;
    let mut built = scene.build()?;
    let system = &mut built.system;

    if let Some(path) = &args.resume {
        StateSnapshot::load(path)?.restore(system)?;
        println!("Resumed from {} at frame {}", path.display(), system.frame());
    }

    let mut bus = EventBus::new();
    if args.events {
        bus.add_sink(Box::new(TracingSink::new(tracing::Level::INFO)));
    } else {
        bus.set_enabled(false);
    }

    let frames = args.frames.unwrap_or_else(|| scene.frame_count());
    let progress_every = (frames / 10).max(1);

    for _ in 0..frames {
        let sim_time = system.time();
        let report = system.step()?;
        bus.record_frame(&FrameSample {
            frame: report.frame,
            sim_time,
            dt: scene.config.dt,
            sweeps: report.iterations,
            contacts: report.collisions,
            max_stretch_error: None,
            kinetic: system.kinetic_energy(),
            potential: system.potential_energy(),
            wall_time: report.wall_time,
        });

        if (report.frame + 1) % progress_every == 0 {
            tracing::info!(
                frame = report.frame + 1,
                frames,
                time = report.time,
                "simulating"
            );
        }
    }
    let totals = bus.finish();

    println!("Frames:        {frames}");
    println!("Sim time:      {:.4}s", system.time());
    println!("Wall time:     {:.3}s", totals.wall_time);
    println!("Collisions:    {}", totals.contacts);
    println!("Final KE:      {:.6e}", system.kinetic_energy());

    if let Some(path) = &args.output {
        let geometry = merge_bodies(system, &built.bodies)?;
        save_mesh(path, &geometry)?;
        println!("Geometry written to: {}", path.display());
    }
    if let Some(path) = &args.snapshot {
        StateSnapshot::capture(system).save(path)?;
        println!("Snapshot written to: {}", path.display());
    }

    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(scenario_name: &str, frames: Option<u32>, output_path: Option<&Path>) -> CommandResult {
    println!("Velum Benchmark Suite");
    println!("═════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        let kind = ScenarioKind::from_name(scenario_name).ok_or_else(|| {
            let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
            format!(
                "Unknown scenario: '{scenario_name}'. Available: {}, all",
                available.join(", ")
            )
        })?;
        vec![kind]
    };

    let mut all_metrics = Vec::new();

    for &kind in &scenarios {
        let mut scenario = Scenario::from_kind(kind);
        if let Some(frames) = frames {
            scenario.frames = frames;
        }

        println!(
            "Running: {} ({} verts, {} tris, {} frames)",
            kind.name(),
            scenario.cloth.vertex_count(),
            scenario.cloth.triangle_count(),
            scenario.frames,
        );

        let metrics =
            BenchmarkRunner::run(&scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Collisions:    {}", metrics.total_collisions);
        println!("  Final KE:      {:.6e}", metrics.final_kinetic_energy);
        println!("  Max displace:  {:.4}m", metrics.max_displacement);
        println!("  Stretch error: {:.4}", metrics.max_stretch_error);
        if let Some(ratio) = metrics.volume_ratio {
            println!("  Volume ratio:  {ratio:.4}");
        }
        println!();

        all_metrics.push(metrics);
    }

    match output_path {
        Some(path) => {
            let text = if has_extension(path, "json") {
                BenchmarkMetrics::to_json(&all_metrics)?
            } else {
                BenchmarkMetrics::to_csv(&all_metrics)
            };
            std::fs::write(path, text)?;
            println!("Results written to: {}", path.display());
        }
        None => {
            println!("CSV Output:");
            println!("{}", BenchmarkMetrics::to_csv(&all_metrics));
        }
    }

    Ok(())
}

/// Inspect a state snapshot or mesh file.
pub fn inspect(path: &Path) -> CommandResult {
    if has_extension(path, "obj") || has_extension(path, "json") {
        return inspect_mesh(path);
    }

    println!("Velum Snapshot Inspector");
    println!("────────────────────────");
    println!();

    let snapshot = StateSnapshot::load(path)?;

    println!("Frame:        {}", snapshot.frame);
    println!("Sim time:     {:.4}s", snapshot.time);
    println!("Particles:    {}", snapshot.particle_count());
    println!(
        "Pinned:       {}",
        snapshot.pinned.iter().filter(|&&p| p).count()
    );

    if !snapshot.positions.is_empty() {
        let (min_y, max_y) = snapshot
            .positions
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let max_speed = snapshot
            .velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0, f64::max);
        println!("Y range:      [{min_y:.4}, {max_y:.4}]");
        println!("Max speed:    {max_speed:.4} m/s");
    }

    Ok(())
}

fn inspect_mesh(path: &Path) -> CommandResult {
    println!("Velum Mesh Inspector");
    println!("────────────────────");
    println!();

    let desc = load_mesh(path)?;
    let mut system = ParticleSystem::new(SimulationConfig::default())?;
    let density = system.config().cloth_density;
    let id = system.add_mesh(&desc, density)?;
    let mesh = system.mesh(id)?;
    let particles = system.particles();

    let boundary = mesh.edges.iter().filter(|e| e.is_boundary()).count();
    println!("Vertices:       {}", mesh.vertex_count());
    println!("Triangles:      {}", mesh.triangle_count());
    println!("Edges:          {} ({boundary} boundary)", mesh.edges.len());
    println!("Bend hinges:    {}", mesh.hinges().len());
    println!("Closed:         {}", mesh.is_closed());
    println!("Surface area:   {:.6} m²", mesh.area(particles));
    if mesh.is_closed() {
        println!("Volume:         {:.6} m³", mesh.volume(particles));
    }
    let total_mass: f64 = mesh.vertices.iter().map(|id| particles[id.index()].m).sum();
    println!("Mass @ density: {total_mass:.6} kg");

    Ok(())
}

/// Validate a scene or mesh file.
pub fn validate(path: &Path) -> CommandResult {
    println!("Velum Validator");
    println!("───────────────");
    println!();

    if has_extension(path, "toml") {
        println!("Validating scene: {}", path.display());
        let scene = SceneDescription::load(path)?;
        validate_scene(&scene)?;
        println!(
            "✅ Scene is valid ({} bodies, {} obstacles, {} frames).",
            scene.bodies.len(),
            scene.obstacles.len(),
            scene.frame_count()
        );
    } else if has_extension(path, "obj") || has_extension(path, "json") {
        println!("Validating mesh: {}", path.display());
        let mesh = load_mesh(path)?;
        println!(
            "✅ Mesh is valid ({} verts, {} tris).",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    } else {
        return Err(format!(
            "Unsupported file format '{}'. Use .toml (scene) or .obj/.json (mesh).",
            path.display()
        )
        .into());
    }

    Ok(())
}
