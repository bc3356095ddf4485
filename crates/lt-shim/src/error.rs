//! Error types for shim and endpoint operations.

use thiserror::Error;

/// Result type for shim and endpoint operations.
pub type ShimResult<T> = Result<T, ShimError>;

/// Errors raised by shims or passed through them.
///
/// Shims only ever raise the binding variants themselves. Endpoint and
/// controller failures are returned to the caller exactly as produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShimError {
    /// The shim was used before a controller was bound.
    #[error("No controller bound to {shim}")]
    UnboundController { shim: String },

    /// The bound controller has been dropped while the shim is still in use.
    #[error("Controller bound to {shim} has been released")]
    ControllerReleased { shim: String },

    /// The wrapped sensor or actuator failed.
    #[error("Endpoint failure in {endpoint}: {what}")]
    EndpointFailure { endpoint: String, what: String },

    /// The controller could not produce a setpoint.
    #[error("Controller failure: {what}")]
    ControllerFailure { what: String },
}

impl ShimError {
    /// Build an endpoint failure.
    pub fn endpoint(endpoint: impl Into<String>, what: impl Into<String>) -> Self {
        Self::EndpointFailure {
            endpoint: endpoint.into(),
            what: what.into(),
        }
    }

    /// True for errors caused by a missing or dropped controller binding.
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            Self::UnboundController { .. } | Self::ControllerReleased { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_errors_are_classified() {
        let unbound = ShimError::UnboundController {
            shim: "FeedbackShim(enc)".into(),
        };
        let released = ShimError::ControllerReleased {
            shim: "FeedbackShim(enc)".into(),
        };
        assert!(unbound.is_binding_error());
        assert!(released.is_binding_error());
        assert!(!ShimError::endpoint("enc", "timeout").is_binding_error());
    }

    #[test]
    fn messages_name_the_shim() {
        let err = ShimError::UnboundController {
            shim: "OutputShim(winch)".into(),
        };
        assert_eq!(err.to_string(), "No controller bound to OutputShim(winch)");
    }
}
