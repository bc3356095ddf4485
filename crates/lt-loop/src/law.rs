//! PI control law run by the host loop.
//!
//! `u = kp * (e + integral(e) / ti)`, clamped to `[out_min, out_max]`.
//! The integral stops accumulating while the output is saturated.

use lt_core::{CoreError, CoreResult, Real, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

/// PI gains and output limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiLaw {
    /// Proportional gain.
    pub kp: Real,
    /// Integral time constant (seconds).
    pub ti: Real,
    pub out_min: Real,
    pub out_max: Real,
}

impl PiLaw {
    /// Create a PI law.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ti` - Integral time constant (seconds, must be positive)
    /// * `out_min` - Lower command limit
    /// * `out_max` - Upper command limit (must exceed `out_min`)
    ///
    /// # Errors
    ///
    /// Returns error if a value is not finite, `ti` is not positive, or the
    /// limits are out of order.
    pub fn new(kp: Real, ti: Real, out_min: Real, out_max: Real) -> CoreResult<Self> {
        ensure_finite(kp, "kp")?;
        ensure_positive(ti, "ti")?;
        ensure_finite(out_min, "out_min")?;
        ensure_finite(out_max, "out_max")?;
        if out_min >= out_max {
            return Err(CoreError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        Ok(Self {
            kp,
            ti,
            out_min,
            out_max,
        })
    }

    /// Evaluate one sample of the law.
    ///
    /// # Arguments
    ///
    /// * `state` - Integral carried from the previous sample
    /// * `measurement` - Process variable read this cycle
    /// * `setpoint` - Target value
    /// * `dt` - Time since the previous sample (seconds)
    ///
    /// # Returns
    ///
    /// Next state and the clamped command. While the command is clamped the
    /// returned state equals `state`.
    pub fn update(
        &self,
        state: &PiState,
        measurement: Real,
        setpoint: Real,
        dt: Real,
    ) -> (PiState, Real) {
        let error = setpoint - measurement;
        let integral = state.integral + error * dt;

        let raw = self.kp * (error + integral / self.ti);
        let command = raw.clamp(self.out_min, self.out_max);

        let next = if command == raw {
            PiState { integral }
        } else {
            state.clone()
        };
        (next, command)
    }
}

/// Integral accumulator carried between samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PiState {
    pub integral: Real,
}
