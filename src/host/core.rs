use std::any::{Any, TypeId};
use std::cell::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity under which a host's holder is registered.
pub type HostId = String;

/// Object that can own anchor slots.
///
/// `identity` must return the same value for every call within the host's
/// live span and must never collide with another simultaneously-live host.
/// Hosts without a natural identity can embed a [`HostTag`] and delegate to
/// it. The `Any` supertrait supplies the concrete type identity the store
/// uses to deduplicate lifecycle hook installation.
pub trait Host: Any {
    fn identity(&self) -> HostId;
}

/// Concrete type identity of a host behind a trait object.
///
/// Upcasts to `dyn Any` first so the lookup dispatches through the vtable
/// and reports the host's concrete type rather than `dyn Host` itself.
pub fn concrete_type_of(host: &dyn Host) -> TypeId {
    let any: &dyn Any = host;
    any.type_id()
}

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Lazily assigned, cached host identity.
///
/// The first `resolve` draws a process-unique id and pins it; later calls
/// return the same value. Embed one in a host type whose platform object
/// carries no identifier of its own.
#[derive(Debug, Default)]
pub struct HostTag {
    id: OnceCell<HostId>,
}

impl HostTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self) -> HostId {
        self.id
            .get_or_init(|| format!("host-{}", NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed)))
            .clone()
    }
}
