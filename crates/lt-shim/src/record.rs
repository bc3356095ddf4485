//! Observation records emitted by shims.
//!
//! The `Display` form of a record is the text line consumers parse:
//!
//! | record          | line                                  |
//! |-----------------|---------------------------------------|
//! | entry marker    | `FeedbackShim(lift_encoder).read`     |
//! | source sample   | `sp=1.000 src=0.250 err=0.750`        |
//! | output sample   | `sp=1.000 cmd=0.400` or `cmd=0.400`   |
//! | failure         | `FeedbackShim(lift_encoder).read failed: ...` |

use std::fmt;
use std::sync::Arc;

use lt_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::ShimError;

/// Which side of the loop a shim instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShimKind {
    Feedback,
    Output,
}

impl fmt::Display for ShimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feedback => f.write_str("FeedbackShim"),
            Self::Output => f.write_str("OutputShim"),
        }
    }
}

/// Identifies the shim call a record belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    pub kind: ShimKind,
    pub label: Arc<str>,
    pub op: &'static str,
}

impl CallSite {
    pub fn new(kind: ShimKind, label: Arc<str>, op: &'static str) -> Self {
        Self { kind, label, op }
    }

    /// `Kind(label)`, without the operation.
    pub fn shim_name(&self) -> String {
        format!("{}({})", self.kind, self.label)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}).{}", self.kind, self.label, self.op)
    }
}

/// One feedback observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceSample {
    pub setpoint: Real,
    pub measurement: Real,
    /// `setpoint - measurement`
    pub error: Real,
}

impl SourceSample {
    pub fn new(setpoint: Real, measurement: Real) -> Self {
        Self {
            setpoint,
            measurement,
            error: setpoint - measurement,
        }
    }
}

impl fmt::Display for SourceSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sp={:.3} src={:.3} err={:.3}",
            self.setpoint, self.measurement, self.error
        )
    }
}

/// One output observation. `setpoint` is absent when no controller is bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSample {
    pub setpoint: Option<Real>,
    pub command: Real,
}

impl fmt::Display for OutputSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.setpoint {
            Some(sp) => write!(f, "sp={:.3} cmd={:.3}", sp, self.command),
            None => write!(f, "cmd={:.3}", self.command),
        }
    }
}

/// Everything a shim hands to its [`LogSink`](crate::LogSink).
#[derive(Debug, Clone, PartialEq)]
pub enum ShimRecord {
    /// A shim operation was entered.
    Entry(CallSite),
    /// A feedback value passed through.
    Source(SourceSample),
    /// A command passed through.
    Output(OutputSample),
    /// The operation failed and the error is being returned to the caller.
    Failure { site: CallSite, error: ShimError },
}

impl fmt::Display for ShimRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(site) => site.fmt(f),
            Self::Source(sample) => sample.fmt(f),
            Self::Output(sample) => sample.fmt(f),
            Self::Failure { site, error } => write!(f, "{site} failed: {error}"),
        }
    }
}
