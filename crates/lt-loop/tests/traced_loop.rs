use std::sync::Arc;

use lt_loop::*;
use lt_shim::{MemorySink, NullSink, ShimError, UnboundOutputPolicy};

fn setup(config: &LoopConfig) -> (TracedLoop, SimulatedPlant, MemorySink) {
    let plant = SimulatedPlant::from_config(&config.plant).unwrap();
    let sink = MemorySink::new();
    let control = assemble(config, &plant, Arc::new(sink.clone())).unwrap();
    (control, plant, sink)
}

#[test]
fn bound_loop_settles_on_setpoint() {
    let config = LoopConfig::default();
    let plant = SimulatedPlant::from_config(&config.plant).unwrap();
    let mut control = assemble(&config, &plant, Arc::new(NullSink)).unwrap();
    control.bind_shims();

    let dt = config.period_s;
    let summary = control
        .run(config.cycles, |_| plant.advance(dt))
        .unwrap();

    assert_eq!(summary.applied, config.cycles);
    assert!((plant.value() - config.setpoint).abs() < 0.02, "{}", plant.value());
}

#[test]
fn first_cycle_is_logged_through_both_shims() {
    let (mut control, _plant, sink) = setup(&LoopConfig::default());
    control.bind_shims();
    control.step().unwrap();

    assert_eq!(
        sink.lines(),
        vec![
            "FeedbackShim(plant_sensor).read",
            "sp=1.000 src=0.000 err=1.000",
            "OutputShim(plant_drive).write",
            "sp=1.000 cmd=0.832",
        ]
    );
}

#[test]
fn unbound_loop_halts_without_touching_plant() {
    let (mut control, plant, _sink) = setup(&LoopConfig::default());

    let err = control.step().unwrap_err();
    assert_eq!(
        err,
        LoopError::Shim(ShimError::UnboundController {
            shim: "FeedbackShim(plant_sensor)".into()
        })
    );
    assert_eq!(plant.reads(), 0);
    assert_eq!(plant.writes(), 0);
}

#[test]
fn unbound_loop_skips_cycles_when_configured() {
    let config = LoopConfig {
        on_unbound: CyclePolicy::SkipCycle,
        ..LoopConfig::default()
    };
    let (mut control, plant, _sink) = setup(&config);

    let summary = control.run(4, |_| {}).unwrap();
    assert_eq!(summary.skipped, 4);
    assert_eq!(summary.applied, 0);
    assert!(summary.last.is_none());
    assert_eq!(plant.writes(), 0);

    // Binding late recovers the loop.
    control.bind_shims();
    assert!(matches!(control.step().unwrap(), CycleOutcome::Applied(_)));
    assert_eq!(plant.writes(), 1);
}

#[test]
fn endpoint_failure_is_never_skipped() {
    let config = LoopConfig {
        on_unbound: CyclePolicy::SkipCycle,
        ..LoopConfig::default()
    };
    let (mut control, plant, sink) = setup(&config);
    control.bind_shims();
    plant.set_sensor_fault(Some("no signal"));

    assert_eq!(
        control.step().unwrap_err(),
        LoopError::Shim(ShimError::endpoint("plant_sensor", "no signal"))
    );
    assert!(sink.lines().iter().all(|l| !l.starts_with("sp=")));
    assert_eq!(plant.writes(), 0);
}

#[test]
fn output_shim_forwards_while_unbound_by_default() {
    let (mut control, plant, sink) = setup(&LoopConfig::default());
    let controller = control.controller();
    control.source_mut().bind(&controller);

    control.step().unwrap();
    assert_eq!(plant.writes(), 1);
    assert!(sink.lines().contains(&"cmd=0.832".to_string()));
}

#[test]
fn output_shim_fails_while_unbound_under_fail_policy() {
    let config = LoopConfig {
        unbound_output: UnboundOutputPolicy::Fail,
        ..LoopConfig::default()
    };
    let (mut control, plant, _sink) = setup(&config);
    let controller = control.controller();
    control.source_mut().bind(&controller);

    assert!(matches!(
        control.step(),
        Err(LoopError::Shim(ShimError::UnboundController { .. }))
    ));
    assert_eq!(plant.reads(), 1);
    assert_eq!(plant.writes(), 0);
}

#[test]
fn setpoint_changes_are_seen_next_cycle() {
    let (mut control, _plant, sink) = setup(&LoopConfig::default());
    control.bind_shims();
    control.step().unwrap();
    sink.clear();

    control.set_setpoint(-0.5);
    control.step().unwrap();
    assert!(sink.lines()[1].starts_with("sp=-0.500 src=0.000"));
}
