//! Transparent instrumentation shims for closed-loop controllers.
//!
//! A shim sits between a control loop and one of its endpoints. Every call is
//! forwarded unchanged to the wrapped endpoint while the shim records the
//! loop internals (setpoint, measurement, error, command) to a log sink.
//!
//! # Architecture
//!
//! - [`FeedbackEndpoint`] / [`OutputEndpoint`]: the sensor and actuator capabilities
//! - [`Controller`]: the capability a shim reads the live setpoint from
//! - [`FeedbackShim`] / [`OutputShim`]: shims implementing the capability they wrap,
//!   so they stack
//! - [`ControllerSlot`]: late, non-owning binding of the controller back-reference
//! - [`LogSink`]: where [`ShimRecord`]s go ([`TracingSink`] by default)
//!
//! # Construction protocol
//!
//! The controller needs the shims as its endpoints, and the shims need the
//! controller. Build the shims first, hand them to the controller, then bind:
//!
//! ```
//! use std::sync::Arc;
//! use lt_shim::{
//!     Controller, FeedbackEndpoint, FeedbackShim, MeasurementType, MemorySink, ShimResult,
//! };
//!
//! struct Encoder(f64, MeasurementType);
//!
//! impl FeedbackEndpoint for Encoder {
//!     fn read(&mut self) -> ShimResult<f64> {
//!         Ok(self.0)
//!     }
//!     fn set_measurement_type(&mut self, kind: MeasurementType) {
//!         self.1 = kind;
//!     }
//!     fn measurement_type(&self) -> MeasurementType {
//!         self.1
//!     }
//! }
//!
//! struct Fixed(f64);
//!
//! impl Controller for Fixed {
//!     fn setpoint(&self) -> ShimResult<f64> {
//!         Ok(self.0)
//!     }
//! }
//!
//! let sink = MemorySink::new();
//! let mut source = FeedbackShim::new(Encoder(0.25, MeasurementType::Displacement))
//!     .with_label("lift_encoder")
//!     .with_sink(Arc::new(sink.clone()));
//!
//! // Reading before binding is reported, not tolerated.
//! assert!(source.read().is_err());
//!
//! let controller = Arc::new(Fixed(1.0));
//! source.bind(&controller);
//!
//! assert_eq!(source.read().unwrap(), 0.25);
//! assert!(sink.lines().contains(&"sp=1.000 src=0.250 err=0.750".to_string()));
//! ```

pub mod controller;
pub mod endpoint;
pub mod error;
pub mod output;
pub mod record;
pub mod sink;
pub mod source;

pub use controller::{Controller, ControllerSlot};
pub use endpoint::{FeedbackEndpoint, MeasurementType, OutputEndpoint};
pub use error::{ShimError, ShimResult};
pub use output::{OutputShim, UnboundOutputPolicy};
pub use record::{CallSite, OutputSample, ShimKind, ShimRecord, SourceSample};
pub use sink::{LogSink, MemorySink, NullSink, TracingSink};
pub use source::FeedbackShim;
