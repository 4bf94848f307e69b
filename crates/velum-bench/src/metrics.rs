//! Benchmark metrics: data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Particles in the system, obstacle vertices included.
    pub particle_count: usize,
    /// Triangles of the deformable body.
    pub triangle_count: usize,
    /// Number of frames executed.
    pub frames: u32,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per frame (seconds).
    pub avg_step_time: f64,
    /// Minimum frame time.
    pub min_step_time: f64,
    /// Maximum frame time.
    pub max_step_time: f64,
    /// Average relaxation sweeps per frame.
    pub avg_iterations: f64,
    /// Collision corrections summed over all frames.
    pub total_collisions: usize,
    /// Final kinetic energy (should approach zero for a settled drape).
    pub final_kinetic_energy: f64,
    /// Maximum vertex displacement from the rest position.
    pub max_displacement: f64,
    /// Largest relative edge-length error at the final frame.
    pub max_stretch_error: f64,
    /// Final volume over rest volume, for closed bodies.
    pub volume_ratio: Option<f64>,
    /// Lowest vertex height of the body at the final frame.
    pub min_height: f64,
}

impl BenchmarkMetrics {
    /// CSV header matching [`to_csv_row`](Self::to_csv_row).
    pub fn to_csv_header() -> String {
        "scenario,particle_count,triangle_count,frames,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,avg_iterations,collisions,final_ke,max_displacement,max_stretch_error,volume_ratio,min_height".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        let volume_ratio = self
            .volume_ratio
            .map(|r| format!("{r:.4}"))
            .unwrap_or_default();
        format!(
            "{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.1},{},{:.6e},{:.6},{:.6},{},{:.6}",
            self.scenario,
            self.particle_count,
            self.triangle_count,
            self.frames,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.avg_iterations,
            self.total_collisions,
            self.final_kinetic_energy,
            self.max_displacement,
            self.max_stretch_error,
            volume_ratio,
            self.min_height,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }

    /// Format multiple metrics as pretty-printed JSON.
    pub fn to_json(metrics: &[BenchmarkMetrics]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(metrics)
    }
}
