//! Simulated first-order plant with sensor and drive endpoints.
//!
//! Dynamics: `dx/dt = (gain * u - x) / tau`, clamped to
//! `[-rate_limit, rate_limit]`. The sensor reports `x` (displacement) or
//! `dx/dt` (rate); the drive sets `u`. Faults can be injected on either
//! endpoint to exercise error propagation.

use std::sync::{Arc, Mutex, MutexGuard};

use lt_core::{CoreResult, Real, ensure_finite, ensure_positive};
use lt_shim::{FeedbackEndpoint, MeasurementType, OutputEndpoint, ShimError, ShimResult};
use serde::{Deserialize, Serialize};

use crate::config::PlantConfig;

/// Parameters of the first-order response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantModel {
    /// Time constant (seconds).
    pub tau: Real,
    /// Steady-state output per unit command.
    pub gain: Real,
    /// Maximum |dx/dt|.
    pub rate_limit: Real,
}

impl PlantModel {
    /// Create a first-order plant model.
    ///
    /// # Arguments
    ///
    /// * `tau` - Time constant in seconds (must be positive)
    /// * `gain` - Steady-state output per unit command
    /// * `rate_limit` - Maximum |dx/dt| (must be positive)
    ///
    /// # Errors
    ///
    /// Returns error if `tau` or `rate_limit` are not positive, or `gain` is
    /// not finite.
    pub fn new(tau: Real, gain: Real, rate_limit: Real) -> CoreResult<Self> {
        Ok(Self {
            tau: ensure_positive(tau, "tau")?,
            gain: ensure_finite(gain, "gain")?,
            rate_limit: ensure_positive(rate_limit, "rate_limit")?,
        })
    }

    /// Rate of change at `value` under `command`.
    pub fn rate(&self, value: Real, command: Real) -> Real {
        ((self.gain * command - value) / self.tau).clamp(-self.rate_limit, self.rate_limit)
    }
}

#[derive(Debug)]
struct PlantState {
    value: Real,
    rate: Real,
    command: Real,
    kind: MeasurementType,
    sensor_fault: Option<String>,
    drive_fault: Option<String>,
    reads: u64,
    writes: u64,
}

/// Shared plant; sensors and drives created from it see the same state.
#[derive(Debug, Clone)]
pub struct SimulatedPlant {
    model: PlantModel,
    state: Arc<Mutex<PlantState>>,
}

fn lock(state: &Mutex<PlantState>) -> MutexGuard<'_, PlantState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SimulatedPlant {
    /// A plant at rest at `initial`, with no faults and zero command.
    pub fn new(model: PlantModel, initial: Real) -> Self {
        Self {
            model,
            state: Arc::new(Mutex::new(PlantState {
                value: initial,
                rate: 0.0,
                command: 0.0,
                kind: MeasurementType::Displacement,
                sensor_fault: None,
                drive_fault: None,
                reads: 0,
                writes: 0,
            })),
        }
    }

    pub fn from_config(config: &PlantConfig) -> CoreResult<Self> {
        let model = PlantModel::new(config.tau, config.gain, config.rate_limit)?;
        Ok(Self::new(model, ensure_finite(config.initial, "initial")?))
    }

    pub fn model(&self) -> &PlantModel {
        &self.model
    }

    /// A feedback endpoint named `name` over this plant.
    pub fn sensor(&self, name: impl Into<String>) -> PlantSensor {
        PlantSensor {
            name: name.into(),
            state: Arc::clone(&self.state),
        }
    }

    /// An output endpoint named `name` over this plant.
    pub fn drive(&self, name: impl Into<String>) -> PlantDrive {
        PlantDrive {
            name: name.into(),
            state: Arc::clone(&self.state),
        }
    }

    /// Integrate the plant forward by `dt` seconds (explicit Euler).
    pub fn advance(&self, dt: Real) {
        let mut state = lock(&self.state);
        let rate = self.model.rate(state.value, state.command);
        state.rate = rate;
        state.value += rate * dt;
    }

    pub fn value(&self) -> Real {
        lock(&self.state).value
    }

    /// Last command applied through a drive.
    pub fn command(&self) -> Real {
        lock(&self.state).command
    }

    /// Make every sensor read fail with `what` (or stop failing with `None`).
    pub fn set_sensor_fault(&self, what: Option<&str>) {
        lock(&self.state).sensor_fault = what.map(str::to_string);
    }

    /// Make every drive write fail with `what` (or stop failing with `None`).
    pub fn set_drive_fault(&self, what: Option<&str>) {
        lock(&self.state).drive_fault = what.map(str::to_string);
    }

    /// Successful sensor reads so far.
    pub fn reads(&self) -> u64 {
        lock(&self.state).reads
    }

    /// Successful drive writes so far.
    pub fn writes(&self) -> u64 {
        lock(&self.state).writes
    }
}

/// Feedback endpoint over a [`SimulatedPlant`].
#[derive(Debug)]
pub struct PlantSensor {
    name: String,
    state: Arc<Mutex<PlantState>>,
}

impl FeedbackEndpoint for PlantSensor {
    fn read(&mut self) -> ShimResult<Real> {
        let mut state = lock(&self.state);
        if let Some(fault) = &state.sensor_fault {
            return Err(ShimError::endpoint(&self.name, fault.as_str()));
        }
        state.reads += 1;
        Ok(match state.kind {
            MeasurementType::Displacement => state.value,
            MeasurementType::Rate => state.rate,
        })
    }

    fn set_measurement_type(&mut self, kind: MeasurementType) {
        lock(&self.state).kind = kind;
    }

    fn measurement_type(&self) -> MeasurementType {
        lock(&self.state).kind
    }
}

/// Output endpoint over a [`SimulatedPlant`].
#[derive(Debug)]
pub struct PlantDrive {
    name: String,
    state: Arc<Mutex<PlantState>>,
}

impl OutputEndpoint for PlantDrive {
    fn write(&mut self, command: Real) -> ShimResult<()> {
        let mut state = lock(&self.state);
        if let Some(fault) = &state.drive_fault {
            return Err(ShimError::endpoint(&self.name, fault.as_str()));
        }
        state.command = command;
        state.writes += 1;
        Ok(())
    }
}
