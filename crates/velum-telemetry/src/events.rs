//! Simulation event types.
//!
//! Structured events emitted once or a few times per frame. Events are
//! lightweight value types that carry just enough data to be useful for
//! monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event, tagged with the frame it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Frame number (0-indexed).
    pub frame: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Frame started.
    FrameBegin {
        /// Simulation time at the start of the frame (seconds).
        sim_time: f64,
        /// Timestep (seconds).
        dt: f64,
    },

    /// Frame completed.
    FrameEnd {
        /// Wall-clock time for the entire frame (seconds).
        wall_time: f64,
    },

    /// Constraint relaxation finished for the frame.
    Relaxation {
        /// Sweeps performed.
        iterations: u32,
        /// Largest relative edge-length error after the sweeps, if the
        /// driver measured it.
        max_stretch_error: Option<f64>,
    },

    /// Collision corrections applied during the frame.
    Collisions {
        /// Number of corrections.
        count: usize,
    },

    /// Energy snapshot at the end of the frame.
    Energy {
        /// Kinetic energy (0.5 * m * v^2).
        kinetic: f64,
        /// Gravitational potential energy.
        potential: f64,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given frame.
    pub fn new(frame: u64, kind: EventKind) -> Self {
        Self { frame, kind }
    }

    /// Creates a custom event whose payload is `value` encoded as JSON.
    pub fn custom<T: Serialize>(frame: u64, label: impl Into<String>, value: &T) -> Self {
        let payload = serde_json::to_string(value).unwrap_or_else(|e| format!("\"{e}\""));
        Self::new(
            frame,
            EventKind::Custom {
                label: label.into(),
                payload,
            },
        )
    }

    /// Short name of the event kind.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EventKind::FrameBegin { .. } => "frame_begin",
            EventKind::FrameEnd { .. } => "frame_end",
            EventKind::Relaxation { .. } => "relaxation",
            EventKind::Collisions { .. } => "collisions",
            EventKind::Energy { .. } => "energy",
            EventKind::Custom { .. } => "custom",
        }
    }
}
