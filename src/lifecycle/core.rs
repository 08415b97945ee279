use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::host::{Host, concrete_type_of};

/// Callback run when a host instance leaves its active context.
pub type DetachHandler = Rc<dyn Fn(&dyn Host)>;

/// Capability to observe host detachment, one installation per host type.
///
/// Implementations arrange for `handler` to run exactly once per detachment
/// event of any instance of `host_type`, on the same execution context as
/// the rest of the crate. An implementation that intercepts an existing
/// notification path must still invoke the original behavior unchanged.
/// Installing twice for one type must be a no-op; the store already
/// deduplicates, so this only matters when several stores share a signal.
pub trait LifecycleSignal {
    fn install(&self, host_type: TypeId, handler: DetachHandler);
}

/// In-process detachment dispatcher.
///
/// Reference implementation of [`LifecycleSignal`] for applications that own
/// their detachment events: the application calls [`DetachBus::notify_detached`]
/// when a host exits its active context, and the bus routes the event to the
/// handler installed for the host's concrete type.
#[derive(Default)]
pub struct DetachBus {
    handlers: RefCell<HashMap<TypeId, DetachHandler>>,
}

impl DetachBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch the detachment of `host` to its type's handler, if any.
    pub fn notify_detached(&self, host: &dyn Host) {
        let handler = self.handlers.borrow().get(&concrete_type_of(host)).cloned();
        if let Some(handler) = handler {
            handler(host);
        }
    }

    /// Number of host types with an installed handler.
    pub fn installed_types(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl LifecycleSignal for DetachBus {
    fn install(&self, host_type: TypeId, handler: DetachHandler) {
        self.handlers
            .borrow_mut()
            .entry(host_type)
            .or_insert(handler);
    }
}
