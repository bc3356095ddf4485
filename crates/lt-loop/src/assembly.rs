//! Wiring a traced loop over a simulated plant.

use std::sync::Arc;

use lt_shim::{FeedbackShim, LogSink, OutputShim};

use crate::config::LoopConfig;
use crate::control_loop::ControlLoop;
use crate::error::LoopResult;
use crate::plant::{PlantDrive, PlantSensor, SimulatedPlant};

/// A loop whose endpoints are shims over a simulated plant.
pub type TracedLoop = ControlLoop<FeedbackShim<PlantSensor>, OutputShim<PlantDrive>>;

/// Build the shims over `plant` and the loop that owns them.
///
/// The shims are returned unbound; call
/// [`ControlLoop::bind_shims`] before stepping.
pub fn assemble(
    config: &LoopConfig,
    plant: &SimulatedPlant,
    sink: Arc<dyn LogSink>,
) -> LoopResult<TracedLoop> {
    config.validate()?;

    let source = FeedbackShim::new(plant.sensor(config.source_label.as_str()))
        .with_label(config.source_label.as_str())
        .with_sink(Arc::clone(&sink));
    let output = OutputShim::new(plant.drive(config.output_label.as_str()))
        .with_label(config.output_label.as_str())
        .with_sink(sink)
        .with_unbound_policy(config.unbound_output);

    let control = ControlLoop::new(config.law()?, config.period()?, source, output)
        .with_policy(config.on_unbound);
    control.set_setpoint(config.setpoint);
    Ok(control)
}
