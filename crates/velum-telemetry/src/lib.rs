//! # velum-telemetry
//!
//! Event bus for simulation telemetry. Drivers hand the bus one
//! [`FrameSample`] per step; it turns each into structured frame events
//! that pluggable sinks consume (an in-memory sink for tests and tools, a
//! `tracing` sink for logs) and keeps run totals.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::{EventBus, FrameSample, RunTotals};
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
