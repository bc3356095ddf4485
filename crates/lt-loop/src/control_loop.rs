//! The periodic control cycle.

use std::sync::Arc;

use lt_core::Real;
use lt_shim::{
    Controller, FeedbackEndpoint, FeedbackShim, OutputEndpoint, OutputShim, ShimError,
};
use serde::{Deserialize, Serialize};

use crate::error::LoopResult;
use crate::law::{PiLaw, PiState};
use crate::period::{CycleClock, LoopPeriod};
use crate::setpoint::SetpointHandle;

/// How a cycle reacts when a shim reports that no controller is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Return the error to the caller; the loop stops.
    #[default]
    Halt,
    /// Apply no output this cycle and carry on with the next one.
    SkipCycle,
}

/// Values seen during one applied cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub time_s: Real,
    pub setpoint: Real,
    pub measurement: Real,
    pub command: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Feedback was read and a command written.
    Applied(CycleReport),
    /// The cycle was dropped under [`CyclePolicy::SkipCycle`].
    Skipped { cycle: u64, reason: String },
}

/// Totals over a [`ControlLoop::run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopSummary {
    pub cycles: u64,
    pub applied: u64,
    pub skipped: u64,
    pub last: Option<CycleReport>,
}

/// A PI loop over a feedback endpoint and an output endpoint.
///
/// The loop owns its endpoints. The setpoint lives in a shared
/// [`SetpointHandle`], which is what shims bind to.
pub struct ControlLoop<S, O> {
    law: PiLaw,
    state: PiState,
    source: S,
    output: O,
    setpoint: Arc<SetpointHandle>,
    clock: CycleClock,
    policy: CyclePolicy,
}

impl<S: FeedbackEndpoint, O: OutputEndpoint> ControlLoop<S, O> {
    /// Create a loop with setpoint 0 and [`CyclePolicy::Halt`].
    ///
    /// # Arguments
    ///
    /// * `law` - Control law evaluated each cycle
    /// * `period` - Sample period passed to the law as `dt`
    /// * `source` - Feedback endpoint read once per cycle
    /// * `output` - Output endpoint written once per applied cycle
    pub fn new(law: PiLaw, period: LoopPeriod, source: S, output: O) -> Self {
        Self {
            law,
            state: PiState::default(),
            source,
            output,
            setpoint: Arc::new(SetpointHandle::default()),
            clock: CycleClock::new(period),
            policy: CyclePolicy::default(),
        }
    }

    /// Set how binding errors are handled.
    pub fn with_policy(mut self, policy: CyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The controller handle shims should bind to.
    pub fn controller(&self) -> Arc<SetpointHandle> {
        Arc::clone(&self.setpoint)
    }

    pub fn set_setpoint(&self, value: Real) {
        self.setpoint.set(value);
    }

    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    pub fn clock(&self) -> &CycleClock {
        &self.clock
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Run one cycle: read feedback, evaluate the law, write the command.
    ///
    /// # Returns
    ///
    /// [`CycleOutcome::Applied`] with the values used, or
    /// [`CycleOutcome::Skipped`] when a binding error was absorbed under
    /// [`CyclePolicy::SkipCycle`]. The clock advances on both; the law state
    /// only on an applied cycle.
    pub fn step(&mut self) -> LoopResult<CycleOutcome> {
        let cycle = self.clock.cycle();
        let time_s = self.clock.time();

        let measurement = match self.source.read() {
            Ok(m) => m,
            Err(e) => return self.absorb(cycle, e),
        };
        let setpoint = self.setpoint.setpoint()?;

        let dt = self.clock.period().dt;
        let (state, command) = self.law.update(&self.state, measurement, setpoint, dt);

        if let Err(e) = self.output.write(command) {
            return self.absorb(cycle, e);
        }

        self.state = state;
        self.clock.tick();
        Ok(CycleOutcome::Applied(CycleReport {
            cycle,
            time_s,
            setpoint,
            measurement,
            command,
        }))
    }

    /// Run `cycles` cycles, calling `on_cycle` after each.
    pub fn run<F>(&mut self, cycles: u64, mut on_cycle: F) -> LoopResult<LoopSummary>
    where
        F: FnMut(&CycleOutcome),
    {
        tracing::info!(cycles, policy = ?self.policy, "control loop starting");
        let mut summary = LoopSummary::default();
        for _ in 0..cycles {
            let outcome = self.step()?;
            summary.cycles += 1;
            match &outcome {
                CycleOutcome::Applied(report) => {
                    summary.applied += 1;
                    summary.last = Some(report.clone());
                }
                CycleOutcome::Skipped { .. } => summary.skipped += 1,
            }
            on_cycle(&outcome);
        }
        Ok(summary)
    }

    fn absorb(&mut self, cycle: u64, error: ShimError) -> LoopResult<CycleOutcome> {
        if self.policy == CyclePolicy::SkipCycle && error.is_binding_error() {
            tracing::warn!(cycle, "skipping cycle: {error}");
            self.clock.tick();
            return Ok(CycleOutcome::Skipped {
                cycle,
                reason: error.to_string(),
            });
        }
        Err(error.into())
    }
}

impl<E, F> ControlLoop<FeedbackShim<E>, OutputShim<F>>
where
    E: FeedbackEndpoint,
    F: OutputEndpoint,
{
    /// Bind both shims to this loop's setpoint. Call once after construction,
    /// before the first [`step`](Self::step).
    pub fn bind_shims(&mut self) {
        let controller = self.controller();
        self.source.bind(&controller);
        self.output.bind(&controller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_shim::{MeasurementType, ShimResult};

    struct Fixed(Real);

    impl FeedbackEndpoint for Fixed {
        fn read(&mut self) -> ShimResult<Real> {
            Ok(self.0)
        }

        fn set_measurement_type(&mut self, _kind: MeasurementType) {}

        fn measurement_type(&self) -> MeasurementType {
            MeasurementType::Displacement
        }
    }

    #[derive(Default)]
    struct Log(Vec<Real>);

    impl OutputEndpoint for Log {
        fn write(&mut self, command: Real) -> ShimResult<()> {
            self.0.push(command);
            Ok(())
        }
    }

    fn direct_loop(pv: Real) -> ControlLoop<Fixed, Log> {
        ControlLoop::new(
            PiLaw::new(1.0, 1.0e9, -10.0, 10.0).unwrap(),
            LoopPeriod::new(0.1).unwrap(),
            Fixed(pv),
            Log::default(),
        )
    }

    #[test]
    fn step_writes_law_output() {
        let mut control = direct_loop(0.25);
        control.set_setpoint(1.0);

        let outcome = control.step().unwrap();
        match outcome {
            CycleOutcome::Applied(report) => {
                assert_eq!(report.cycle, 0);
                assert_eq!(report.measurement, 0.25);
                assert_eq!(control.output().0, vec![report.command]);
                assert!((report.command - 0.75).abs() < 1e-6);
            }
            CycleOutcome::Skipped { .. } => panic!("expected an applied cycle"),
        }
        assert_eq!(control.clock().cycle(), 1);
    }

    #[test]
    fn run_counts_cycles() {
        let mut control = direct_loop(0.0);
        let mut seen = 0;
        let summary = control.run(5, |_| seen += 1).unwrap();
        assert_eq!(seen, 5);
        assert_eq!(summary.applied, 5);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.last.map(|r| r.cycle), Some(4));
    }

    #[test]
    fn non_finite_setpoint_halts() {
        let mut control = direct_loop(0.0).with_policy(CyclePolicy::SkipCycle);
        control.set_setpoint(Real::NAN);
        assert!(control.step().is_err());
        assert!(control.output().0.is_empty());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = CycleOutcome::Skipped {
            cycle: 3,
            reason: "unbound".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "skipped");
        assert_eq!(json["cycle"], 3);
    }
}
