//! Benchmark runner: executes scenarios on a particle system and collects
//! metrics, optionally streaming per-frame telemetry.

use std::time::Instant;

use velum_mesh::{Mesh, Particle};
use velum_solver::ParticleSystem;
use velum_telemetry::{EventBus, FrameSample};
use velum_types::{MeshId, Scalar, VelumResult};

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

/// Largest `|length / rest - 1|` over the edges of `mesh`.
pub fn max_stretch_error(mesh: &Mesh, particles: &[Particle]) -> Scalar {
    mesh.edges
        .iter()
        .filter(|e| e.rest_length > 0.0)
        .map(|e| (e.length(particles) / e.rest_length - 1.0).abs())
        .fold(0.0, Scalar::max)
}

impl BenchmarkRunner {
    /// Builds the particle system for `scenario`. Returns the system and
    /// the id of the deformable body.
    pub fn setup(scenario: &Scenario) -> VelumResult<(ParticleSystem, MeshId)> {
        let mut system = ParticleSystem::new(scenario.config.clone())?;
        system.add_gravity();

        if let Some(obstacle) = &scenario.obstacle {
            system.add_static_mesh(obstacle)?;
        }

        let cloth = system.add_mesh(&scenario.cloth, scenario.config.cloth_density)?;
        system.add_mesh_constraints(cloth)?;
        let vertices = system.mesh(cloth)?.vertices.clone();
        for &pin in &scenario.pins {
            if let Some(&id) = vertices.get(pin as usize) {
                system.set_pinned(id, true)?;
            } else {
                tracing::warn!(pin, "pin outside the body, ignored");
            }
        }
        Ok((system, cloth))
    }

    /// Run a single scenario.
    pub fn run(scenario: &Scenario) -> VelumResult<BenchmarkMetrics> {
        Self::execute(scenario, None)
    }

    /// Run a single scenario, emitting frame events into `bus`.
    pub fn run_with_bus(scenario: &Scenario, bus: &mut EventBus) -> VelumResult<BenchmarkMetrics> {
        Self::execute(scenario, Some(bus))
    }

    fn execute(scenario: &Scenario, mut bus: Option<&mut EventBus>) -> VelumResult<BenchmarkMetrics> {
        let (mut system, cloth) = Self::setup(scenario)?;
        let dt = scenario.config.dt;

        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.frames as usize);
        let mut total_iterations: u64 = 0;
        let mut total_collisions = 0usize;

        tracing::info!(
            scenario = scenario.kind.name(),
            frames = scenario.frames,
            particles = system.particles().len(),
            "benchmark started"
        );
        let total_start = Instant::now();

        for _ in 0..scenario.frames {
            let sim_time = system.time();
            let report = system.advance_time(dt)?;
            step_times.push(report.wall_time);
            total_iterations += u64::from(report.iterations);
            total_collisions += report.collisions;

            if let Some(bus) = bus.as_deref_mut() {
                bus.record_frame(&FrameSample {
                    frame: report.frame,
                    sim_time,
                    dt,
                    sweeps: report.iterations,
                    contacts: report.collisions,
                    max_stretch_error: Some(max_stretch_error(
                        system.mesh(cloth)?,
                        system.particles(),
                    )),
                    kinetic: system.kinetic_energy(),
                    potential: system.potential_energy(),
                    wall_time: report.wall_time,
                });
            }
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();
        if let Some(bus) = bus {
            let totals = bus.finish();
            tracing::debug!(frames = totals.frames, sweeps = totals.sweeps, "telemetry closed");
        }

        let particles = system.particles();
        let mesh = system.mesh(cloth)?;

        let max_displacement = mesh
            .vertices
            .iter()
            .map(|id| {
                let p = &particles[id.index()];
                (p.x - p.x0).length()
            })
            .fold(0.0, Scalar::max);
        let min_height = mesh
            .vertices
            .iter()
            .map(|id| particles[id.index()].x.y)
            .fold(Scalar::INFINITY, Scalar::min);
        let volume_ratio = (mesh.is_closed() && mesh.rest_volume().abs() > 0.0)
            .then(|| mesh.volume(particles) / mesh.rest_volume());

        let frames = step_times.len();
        let (avg_step, avg_iter) = if frames == 0 {
            (0.0, 0.0)
        } else {
            (
                step_times.iter().sum::<f64>() / frames as f64,
                total_iterations as f64 / frames as f64,
            )
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);

        let metrics = BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            particle_count: particles.len(),
            triangle_count: mesh.triangle_count(),
            frames: scenario.frames,
            total_wall_time,
            avg_step_time: avg_step,
            min_step_time: if frames == 0 { 0.0 } else { min_step },
            max_step_time: max_step,
            avg_iterations: avg_iter,
            total_collisions,
            final_kinetic_energy: system.kinetic_energy(),
            max_displacement,
            max_stretch_error: max_stretch_error(mesh, particles),
            volume_ratio,
            min_height,
        };
        tracing::info!(
            scenario = %metrics.scenario,
            wall_time = metrics.total_wall_time,
            collisions = metrics.total_collisions,
            "benchmark finished"
        );
        Ok(metrics)
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all() -> VelumResult<Vec<BenchmarkMetrics>> {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&Scenario::from_kind(kind)))
            .collect()
    }
}
