//! Per-frame solver statistics.

use serde::{Deserialize, Serialize};
use velum_types::Scalar;

/// Result of one `advance_time` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Index of the frame just completed, starting at 0.
    pub frame: u64,
    /// Simulation time after the frame (seconds).
    pub time: Scalar,
    /// Relaxation sweeps performed.
    pub iterations: u32,
    /// Collision corrections applied across all sweeps.
    pub collisions: usize,
    /// Wall-clock time for this frame (seconds).
    pub wall_time: f64,
}
