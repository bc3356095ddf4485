//! Controller capability and the late-bound back-reference shims hold to it.

use std::fmt;
use std::sync::{Arc, Weak};

use lt_core::Real;

use crate::error::{ShimError, ShimResult};

/// Anything a shim can ask for the loop's current setpoint.
pub trait Controller: Send + Sync {
    /// Current target value of the loop.
    fn setpoint(&self) -> ShimResult<Real>;
}

/// Non-owning, late-bound reference from a shim to its controller.
///
/// Starts empty. [`bind`](Self::bind) replaces whatever was bound before.
/// Resolving an empty slot yields [`ShimError::UnboundController`]; resolving
/// a slot whose controller has since been dropped yields
/// [`ShimError::ControllerReleased`].
#[derive(Clone, Default)]
pub struct ControllerSlot {
    bound: Option<Weak<dyn Controller>>,
}

impl ControllerSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or re-bind) the controller. The slot does not keep it alive.
    pub fn bind<C: Controller + 'static>(&mut self, controller: &Arc<C>) {
        let weak: Weak<C> = Arc::downgrade(controller);
        self.bound = Some(weak as Weak<dyn Controller>);
    }

    /// [`bind`](Self::bind) for a controller already held as a trait object.
    pub fn bind_dyn(&mut self, controller: &Arc<dyn Controller>) {
        self.bound = Some(Arc::downgrade(controller));
    }

    /// Drop the binding.
    pub fn unbind(&mut self) {
        self.bound = None;
    }

    /// True once [`bind`](Self::bind) has been called and not undone.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Upgrade the binding for use by `shim`.
    pub fn resolve(&self, shim: &str) -> ShimResult<Arc<dyn Controller>> {
        let weak = self
            .bound
            .as_ref()
            .ok_or_else(|| ShimError::UnboundController {
                shim: shim.to_string(),
            })?;
        weak.upgrade().ok_or_else(|| ShimError::ControllerReleased {
            shim: shim.to_string(),
        })
    }

    /// Read the bound controller's setpoint on behalf of `shim`.
    pub fn setpoint(&self, shim: &str) -> ShimResult<Real> {
        self.resolve(shim)?.setpoint()
    }
}

impl fmt::Debug for ControllerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.bound {
            None => "unbound",
            Some(weak) if weak.strong_count() == 0 => "released",
            Some(_) => "bound",
        };
        f.debug_struct("ControllerSlot")
            .field("state", &state)
            .finish()
    }
}
