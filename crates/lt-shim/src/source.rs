//! Feedback side shim.

use std::sync::Arc;

use lt_core::Real;

use crate::controller::{Controller, ControllerSlot};
use crate::endpoint::{FeedbackEndpoint, MeasurementType};
use crate::error::ShimResult;
use crate::record::{CallSite, ShimKind, ShimRecord, SourceSample};
use crate::sink::{LogSink, TracingSink};

/// Wraps a [`FeedbackEndpoint`] and logs `{setpoint, measurement, error}` on
/// every read.
///
/// The measurement returned by [`read`](FeedbackEndpoint::read) is exactly the
/// value the wrapped endpoint produced, and endpoint errors come back
/// unchanged. Reading before [`bind`](Self::bind) fails with
/// [`ShimError::UnboundController`](crate::ShimError::UnboundController)
/// without touching the wrapped endpoint.
pub struct FeedbackShim<E> {
    inner: E,
    controller: ControllerSlot,
    label: Arc<str>,
    sink: Arc<dyn LogSink>,
}

impl<E: FeedbackEndpoint> FeedbackShim<E> {
    /// Wrap `inner`. Logs go to [`TracingSink`] under the label `"source"`.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            controller: ControllerSlot::new(),
            label: Arc::from("source"),
            sink: Arc::new(TracingSink),
        }
    }

    /// Name printed in entry markers.
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Send records to `sink` instead of [`TracingSink`]. Sinks may be
    /// shared between shims.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Bind the controller whose setpoint is logged. Must happen after the
    /// controller is built and before the loop starts reading.
    pub fn bind<C: Controller + 'static>(&mut self, controller: &Arc<C>) {
        self.controller.bind(controller);
    }

    /// Bind a controller held as `Arc<dyn Controller>`.
    pub fn bind_dyn(&mut self, controller: &Arc<dyn Controller>) {
        self.controller.bind_dyn(controller);
    }

    /// Forget the controller. Later calls behave as before the first bind.
    pub fn unbind(&mut self) {
        self.controller.unbind();
    }

    pub fn is_bound(&self) -> bool {
        self.controller.is_bound()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Mutable access to the wrapped endpoint. Calls made through it bypass
    /// this shim and are not logged.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    /// Drop the shim and return the wrapped endpoint.
    pub fn into_inner(self) -> E {
        self.inner
    }

    fn site(&self, op: &'static str) -> CallSite {
        CallSite::new(ShimKind::Feedback, Arc::clone(&self.label), op)
    }

    fn observe<T>(&self, site: &CallSite, result: ShimResult<T>) -> ShimResult<T> {
        if let Err(error) = &result {
            self.sink.emit(&ShimRecord::Failure {
                site: site.clone(),
                error: error.clone(),
            });
        }
        result
    }
}

impl<E: FeedbackEndpoint> FeedbackEndpoint for FeedbackShim<E> {
    fn read(&mut self) -> ShimResult<Real> {
        let site = self.site("read");
        self.sink.emit(&ShimRecord::Entry(site.clone()));

        let setpoint = self.controller.setpoint(&site.shim_name());
        let setpoint = self.observe(&site, setpoint)?;

        let measurement = self.inner.read();
        let measurement = self.observe(&site, measurement)?;

        self.sink
            .emit(&ShimRecord::Source(SourceSample::new(setpoint, measurement)));
        Ok(measurement)
    }

    fn set_measurement_type(&mut self, kind: MeasurementType) {
        self.inner.set_measurement_type(kind);
    }

    fn measurement_type(&self) -> MeasurementType {
        self.inner.measurement_type()
    }
}

impl<E> std::fmt::Debug for FeedbackShim<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackShim")
            .field("label", &self.label)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
