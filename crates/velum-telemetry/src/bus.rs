//! Frame event bus.
//!
//! A driver describes every completed step with a [`FrameSample`]. The bus
//! expands the sample into the frame's event sequence, hands it to the
//! registered sinks and keeps running totals for the session.
//!
//! Per frame the sinks see, in order: `FrameBegin`, `Relaxation`,
//! `Collisions` (only when contacts were resolved), `Energy`, `FrameEnd`.

use serde::{Deserialize, Serialize};

use crate::events::{EventKind, SimulationEvent};
use crate::sinks::EventSink;

/// What the driver observed over one step of the predict-then-relax loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Frame index, starting at 0.
    pub frame: u64,
    /// Simulation time at the start of the step (seconds).
    pub sim_time: f64,
    /// Timestep (seconds).
    pub dt: f64,
    /// Relaxation sweeps performed.
    pub sweeps: u32,
    /// Collision corrections applied across all sweeps.
    pub contacts: usize,
    /// Largest relative edge-length error after relaxation, when measured.
    pub max_stretch_error: Option<f64>,
    /// Kinetic energy after the step.
    pub kinetic: f64,
    /// Gravitational potential energy after the step.
    pub potential: f64,
    /// Wall-clock time spent in the step (seconds).
    pub wall_time: f64,
}

/// Totals accumulated over every recorded frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub frames: u64,
    pub sweeps: u64,
    pub contacts: usize,
    pub wall_time: f64,
}

/// Event bus for simulation telemetry.
///
/// Events are queued until [`flush`](Self::flush); [`record_frame`](Self::record_frame)
/// flushes on its own once the frame's events are queued.
pub struct EventBus {
    pending: Vec<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    totals: RunTotals,
    /// Disabled bus still counts totals but delivers nothing.
    enabled: bool,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            sinks: Vec::new(),
            totals: RunTotals::default(),
            enabled: true,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues an event. No-op while the bus is disabled.
    pub fn emit(&mut self, event: SimulationEvent) {
        if self.enabled {
            self.pending.push(event);
        }
    }

    /// Adds `sample` to the totals, queues the frame's events and delivers
    /// them.
    pub fn record_frame(&mut self, sample: &FrameSample) {
        self.totals.frames += 1;
        self.totals.sweeps += u64::from(sample.sweeps);
        self.totals.contacts += sample.contacts;
        self.totals.wall_time += sample.wall_time;

        let frame = sample.frame;
        self.emit(SimulationEvent::new(
            frame,
            EventKind::FrameBegin {
                sim_time: sample.sim_time,
                dt: sample.dt,
            },
        ));
        self.emit(SimulationEvent::new(
            frame,
            EventKind::Relaxation {
                iterations: sample.sweeps,
                max_stretch_error: sample.max_stretch_error,
            },
        ));
        if sample.contacts > 0 {
            self.emit(SimulationEvent::new(
                frame,
                EventKind::Collisions {
                    count: sample.contacts,
                },
            ));
        }
        self.emit(SimulationEvent::new(
            frame,
            EventKind::Energy {
                kinetic: sample.kinetic,
                potential: sample.potential,
            },
        ));
        self.emit(SimulationEvent::new(
            frame,
            EventKind::FrameEnd {
                wall_time: sample.wall_time,
            },
        ));
        self.flush();
    }

    /// Delivers queued events to every sink.
    pub fn flush(&mut self) {
        for event in self.pending.drain(..) {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }
    }

    /// Totals over the frames recorded so far.
    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Emits a `run_totals` custom event, flushes, and lets every sink
    /// finalize. Returns the totals.
    pub fn finish(&mut self) -> RunTotals {
        let totals = self.totals;
        self.emit(SimulationEvent::custom(totals.frames, "run_totals", &totals));
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
        totals
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
