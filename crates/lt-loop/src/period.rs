//! Fixed-rate cycle timing.

use std::time::{Duration, Instant};

use lt_core::{CoreResult, Real, ensure_positive};
use serde::{Deserialize, Serialize};

/// Sample period of a control loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopPeriod {
    /// Seconds between cycles.
    pub dt: Real,
}

impl LoopPeriod {
    /// Create a period of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns error if `dt` is not a positive finite number.
    pub fn new(dt: Real) -> CoreResult<Self> {
        Ok(Self {
            dt: ensure_positive(dt, "period")?,
        })
    }

    /// Period of a loop running at `freq_hz` cycles per second.
    pub fn from_frequency(freq_hz: Real) -> CoreResult<Self> {
        let freq_hz = ensure_positive(freq_hz, "frequency")?;
        Ok(Self { dt: 1.0 / freq_hz })
    }

    pub fn frequency(&self) -> Real {
        1.0 / self.dt
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.dt)
    }
}

/// Counts cycles and maps them onto loop time.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleClock {
    period: LoopPeriod,
    cycle: u64,
}

impl CycleClock {
    /// Start at cycle 0, time 0.
    pub fn new(period: LoopPeriod) -> Self {
        Self { period, cycle: 0 }
    }

    pub fn period(&self) -> LoopPeriod {
        self.period
    }

    /// Index of the cycle about to run.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Loop time at the start of the current cycle, in seconds.
    pub fn time(&self) -> Real {
        self.cycle as Real * self.period.dt
    }

    /// Advance to the next cycle.
    pub fn tick(&mut self) {
        self.cycle += 1;
    }

    pub fn reset(&mut self) {
        self.cycle = 0;
    }

    /// Wall-clock instant at which the current cycle is due, for a loop that
    /// started at `origin`.
    pub fn deadline(&self, origin: Instant) -> Instant {
        origin + self.period.as_duration().mul_f64(self.cycle as f64)
    }
}
