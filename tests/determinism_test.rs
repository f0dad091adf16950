//! Integration tests to verify trace determinism across runs and sinks

use std::convert::Infallible;
use std::ops::ControlFlow;

use pendulums::driver::{Driver, Frame, FrameObserver, Pacing};
use pendulums::trace::CsvTrace;
use pendulums::{BlowUpPolicy, SimulationConfig};

fn unpaced_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.driver.pacing = Pacing::Unpaced;
    config
}

fn trace_to_string(config: &SimulationConfig, steps: u64) -> String {
    let mut driver = Driver::from_config(config).unwrap();
    let mut trace = CsvTrace::new(Vec::new());
    driver.run(Some(steps), &mut trace).unwrap();
    String::from_utf8(trace.into_inner()).unwrap()
}

#[test]
fn test_trace_is_identical_across_runs() {
    let config = unpaced_config();

    let first = trace_to_string(&config, 500);
    let second = trace_to_string(&config, 500);

    assert_eq!(first.lines().count(), 501);
    assert_eq!(first, second, "Same parameters should produce the same trace");
}

#[test]
fn test_observer_does_not_affect_physics() {
    // A trace sink and a plain closure should see the same frames
    let config = unpaced_config();

    let mut closure_frames = Vec::new();
    let mut driver = Driver::from_config(&config).unwrap();
    driver
        .run(Some(200), &mut |frame: &Frame| {
            closure_frames.push(*frame);
            Ok::<_, Infallible>(ControlFlow::Continue(()))
        })
        .unwrap();

    let mut driver = Driver::from_config(&config).unwrap();
    let mut trace = CsvTrace::new(Vec::new());
    let mut trace_frames = Vec::new();
    for _ in 0..200 {
        let frame = driver.step().unwrap();
        assert!(trace.observe(&frame).unwrap().is_continue());
        trace_frames.push(frame);
    }

    assert_eq!(closure_frames, trace_frames);
}

#[test]
fn test_reconfiguration_starts_from_scratch() {
    let config = unpaced_config();
    let mut driver = Driver::from_config(&config).unwrap();
    for _ in 0..50 {
        driver.step().unwrap();
    }

    let mut changed = config.clone();
    changed.physics.gravity = 2.0;
    let fresh = Driver::from_config(&changed).unwrap();

    assert_eq!(fresh.system().steps(), 0);
    assert_eq!(fresh.system().gravity(), 2.0);
    assert_eq!(driver.system().gravity(), 1.0);
}

#[test]
fn test_halt_policy_from_config() {
    let mut config = unpaced_config();
    config.driver.blow_up_policy = BlowUpPolicy::Halt;
    config.physics.upper.mass = f64::MAX;
    config.physics.lower.mass = f64::MAX;

    let mut driver = Driver::from_config(&config).unwrap();
    let mut trace = CsvTrace::new(Vec::new());
    let result = driver.run(Some(10), &mut trace);

    assert!(result.is_err());
    // Nothing reached the sink
    assert!(trace.into_inner().is_empty());
}
