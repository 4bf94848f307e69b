//! Integration tests for velum-telemetry.

use velum_telemetry::bus::{EventBus, FrameSample, RunTotals};
use velum_telemetry::events::{EventKind, SimulationEvent};
use velum_telemetry::sinks::{EventSink, TracingSink, VecSink};

fn sample(frame: u64, contacts: usize) -> FrameSample {
    FrameSample {
        frame,
        sim_time: frame as f64 * 0.01,
        dt: 0.01,
        sweeps: 10,
        contacts,
        max_stretch_error: Some(1e-3),
        kinetic: 0.5,
        potential: -2.0,
        wall_time: 0.002,
    }
}

#[test]
fn emit_waits_for_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.emit(SimulationEvent::new(0, EventKind::Collisions { count: 1 }));
    assert!(sink.is_empty(), "events are delivered on flush only");

    bus.flush();
    assert_eq!(sink.len(), 1);
}

#[test]
fn frame_events_follow_the_step_order() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.record_frame(&sample(4, 7));

    let names: Vec<&str> = sink.events().iter().map(|e| e.kind_name()).collect();
    assert_eq!(
        names,
        vec!["frame_begin", "relaxation", "collisions", "energy", "frame_end"]
    );
    let events = sink.events();
    assert!(events.iter().all(|e| e.frame == 4));
    assert_eq!(events[2].kind, EventKind::Collisions { count: 7 });
    assert_eq!(
        events[1].kind,
        EventKind::Relaxation {
            iterations: 10,
            max_stretch_error: Some(1e-3),
        }
    );
}

#[test]
fn contact_free_frame_has_no_collision_event() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.record_frame(&sample(0, 0));

    assert_eq!(sink.len(), 4);
    assert!(sink
        .events()
        .iter()
        .all(|e| !matches!(e.kind, EventKind::Collisions { .. })));
}

#[test]
fn disabled_bus_still_counts_totals() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    bus.set_enabled(false);
    assert!(!bus.is_enabled());

    bus.record_frame(&sample(0, 3));
    bus.record_frame(&sample(1, 2));
    let totals = bus.finish();

    assert!(sink.is_empty());
    assert_eq!(totals.frames, 2);
    assert_eq!(totals.sweeps, 20);
    assert_eq!(totals.contacts, 5);
    assert!((totals.wall_time - 0.004).abs() < 1e-12);
}

#[test]
fn finish_reports_run_totals_to_every_sink() {
    let mut bus = EventBus::new();
    let a = VecSink::new();
    let b = VecSink::new();
    bus.add_sink(Box::new(a.clone()));
    bus.add_sink(Box::new(b.clone()));
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));
    assert_eq!(bus.sink_count(), 3);

    for frame in 0..3 {
        bus.record_frame(&sample(frame, 1));
    }
    let totals = bus.finish();
    assert_eq!(bus.totals(), totals);

    assert_eq!(a.len(), 3 * 5 + 1);
    assert_eq!(b.events(), a.events());
    let last = a.events().pop().unwrap();
    match last.kind {
        EventKind::Custom { label, payload } => {
            assert_eq!(label, "run_totals");
            let decoded: RunTotals = serde_json::from_str(&payload).unwrap();
            assert_eq!(decoded, totals);
            assert_eq!(decoded.contacts, 3);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn custom_event_payload_is_json() {
    let event = SimulationEvent::custom(3, "pins", &vec![0u32, 4, 8]);
    match &event.kind {
        EventKind::Custom { label, payload } => {
            assert_eq!(label, "pins");
            let decoded: Vec<u32> = serde_json::from_str(payload).unwrap();
            assert_eq!(decoded, vec![0, 4, 8]);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn event_serialization() {
    let event = SimulationEvent::new(
        42,
        EventKind::Relaxation {
            iterations: 10,
            max_stretch_error: Some(1e-4),
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    let decoded: SimulationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn vec_sink_name() {
    let sink = VecSink::new();
    assert_eq!(sink.name(), "vec_sink");
    assert_eq!(TracingSink::new(tracing::Level::INFO).name(), "tracing_sink");
}
