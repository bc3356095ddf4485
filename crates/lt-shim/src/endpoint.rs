//! Sensor and actuator capabilities.
//!
//! Both shims implement the capability they wrap, so any implementor may be
//! a real device or another shim. The capabilities are also implemented for
//! `&mut E` and `Box<E>`, which lets a shim wrap an endpoint it does not own.

use lt_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::ShimResult;

/// What a feedback endpoint reports: a position or a rate of change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    /// Position-like measurement (distance, angle, temperature).
    #[default]
    Displacement,
    /// Rate-like measurement (velocity, flow).
    Rate,
}

/// A source of loop feedback.
pub trait FeedbackEndpoint {
    /// Read the current measurement.
    fn read(&mut self) -> ShimResult<Real>;

    /// Select what kind of quantity [`read`](Self::read) reports.
    fn set_measurement_type(&mut self, kind: MeasurementType);

    /// Kind of quantity [`read`](Self::read) reports.
    fn measurement_type(&self) -> MeasurementType;
}

/// A sink for controller commands.
pub trait OutputEndpoint {
    /// Apply a command value.
    fn write(&mut self, command: Real) -> ShimResult<()>;
}

impl<E: FeedbackEndpoint + ?Sized> FeedbackEndpoint for &mut E {
    fn read(&mut self) -> ShimResult<Real> {
        (**self).read()
    }

    fn set_measurement_type(&mut self, kind: MeasurementType) {
        (**self).set_measurement_type(kind)
    }

    fn measurement_type(&self) -> MeasurementType {
        (**self).measurement_type()
    }
}

impl<E: FeedbackEndpoint + ?Sized> FeedbackEndpoint for Box<E> {
    fn read(&mut self) -> ShimResult<Real> {
        (**self).read()
    }

    fn set_measurement_type(&mut self, kind: MeasurementType) {
        (**self).set_measurement_type(kind)
    }

    fn measurement_type(&self) -> MeasurementType {
        (**self).measurement_type()
    }
}

impl<E: OutputEndpoint + ?Sized> OutputEndpoint for &mut E {
    fn write(&mut self, command: Real) -> ShimResult<()> {
        (**self).write(command)
    }
}

impl<E: OutputEndpoint + ?Sized> OutputEndpoint for Box<E> {
    fn write(&mut self, command: Real) -> ShimResult<()> {
        (**self).write(command)
    }
}
