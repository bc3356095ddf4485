//! Shared setpoint the loop publishes and shims read.

use std::sync::atomic::{AtomicU64, Ordering};

use lt_core::Real;
use lt_shim::{Controller, ShimError, ShimResult};

/// Current loop target, readable from any thread without locking.
#[derive(Debug, Default)]
pub struct SetpointHandle {
    bits: AtomicU64,
}

impl SetpointHandle {
    pub fn new(value: Real) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn set(&self, value: Real) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    pub fn get(&self) -> Real {
        Real::from_bits(self.bits.load(Ordering::Acquire))
    }
}

impl Controller for SetpointHandle {
    fn setpoint(&self) -> ShimResult<Real> {
        let value = self.get();
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ShimError::ControllerFailure {
                what: format!("setpoint is {value}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_back() {
        let handle = SetpointHandle::new(1.5);
        assert_eq!(handle.setpoint().unwrap(), 1.5);
        handle.set(-2.25);
        assert_eq!(handle.get(), -2.25);
    }

    #[test]
    fn non_finite_setpoint_is_a_controller_failure() {
        let handle = SetpointHandle::new(Real::NAN);
        assert!(matches!(
            handle.setpoint(),
            Err(ShimError::ControllerFailure { .. })
        ));
    }
}
