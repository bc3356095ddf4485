//! Error types for loop setup and execution.

use lt_core::CoreError;
use lt_shim::ShimError;
use thiserror::Error;

pub type LoopResult<T> = Result<T, LoopError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoopError {
    /// A shim or endpoint failed and the cycle policy did not absorb it.
    #[error(transparent)]
    Shim(#[from] ShimError),

    /// A numeric parameter was rejected.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The loop configuration is inconsistent.
    #[error("Invalid loop configuration: {what}")]
    InvalidConfig { what: String },

    /// The configuration file could not be read or parsed.
    #[error("Cannot load loop configuration {path}: {what}")]
    ConfigLoad { path: String, what: String },
}
