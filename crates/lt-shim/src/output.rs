//! Actuation side shim.

use std::sync::Arc;

use lt_core::Real;
use serde::{Deserialize, Serialize};

use crate::controller::{Controller, ControllerSlot};
use crate::endpoint::OutputEndpoint;
use crate::error::ShimResult;
use crate::record::{CallSite, OutputSample, ShimKind, ShimRecord};
use crate::sink::{LogSink, TracingSink};

/// What an [`OutputShim`] does with a command while no controller is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnboundOutputPolicy {
    /// Forward the command and log it without setpoint context.
    #[default]
    Forward,
    /// Fail with `UnboundController` and write nothing, like the feedback shim.
    Fail,
}

/// Wraps an [`OutputEndpoint`] and logs every command before forwarding it.
///
/// The wrapped endpoint receives exactly the command passed in, once.
pub struct OutputShim<E> {
    inner: E,
    controller: ControllerSlot,
    label: Arc<str>,
    sink: Arc<dyn LogSink>,
    unbound: UnboundOutputPolicy,
}

impl<E: OutputEndpoint> OutputShim<E> {
    /// Wrap `inner`. Logs go to [`TracingSink`] under the label `"output"`.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            controller: ControllerSlot::new(),
            label: Arc::from("output"),
            sink: Arc::new(TracingSink),
            unbound: UnboundOutputPolicy::default(),
        }
    }

    /// Name printed in entry markers.
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Send records to `sink` instead of [`TracingSink`].
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// What [`write`](OutputEndpoint::write) does before a controller is
    /// bound. Defaults to [`UnboundOutputPolicy::Forward`].
    pub fn with_unbound_policy(mut self, policy: UnboundOutputPolicy) -> Self {
        self.unbound = policy;
        self
    }

    /// Bind the controller whose setpoint is logged next to each command.
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

    pub fn unbound_policy(&self) -> UnboundOutputPolicy {
        self.unbound
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Writes made through this reference are not logged.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn site(&self, op: &'static str) -> CallSite {
        CallSite::new(ShimKind::Output, Arc::clone(&self.label), op)
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

impl<E: OutputEndpoint> OutputEndpoint for OutputShim<E> {
    fn write(&mut self, command: Real) -> ShimResult<()> {
        let site = self.site("write");
        self.sink.emit(&ShimRecord::Entry(site.clone()));

        let setpoint = match self.controller.setpoint(&site.shim_name()) {
            Ok(sp) => Some(sp),
            Err(e) if e.is_binding_error() && self.unbound == UnboundOutputPolicy::Forward => None,
            Err(e) => return self.observe(&site, Err(e)),
        };

        self.sink
            .emit(&ShimRecord::Output(OutputSample { setpoint, command }));

        let written = self.inner.write(command);
        self.observe(&site, written)
    }
}

impl<E> std::fmt::Debug for OutputShim<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputShim")
            .field("label", &self.label)
            .field("controller", &self.controller)
            .field("unbound", &self.unbound)
            .finish_non_exhaustive()
    }
}
