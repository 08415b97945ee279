//! Lifecycle-bound anchor bookkeeping for layout hosts.
//!
//! `anchorage` files layout anchors into named slots bound to a host object
//! and tears everything down automatically when the host leaves its active
//! context. It is a bookkeeping layer only: anchors are opaque tokens, and
//! the crate never computes geometry or flips activation state outside the
//! injected batch runtime.
//!
//! The modules follow the RSB `MODULE_SPEC` pattern: public orchestrator
//! modules re-export from private `core` implementations.

pub mod anchor;
pub mod error;
pub mod holder;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod slot;
pub mod store;

pub use anchor::{Anchor, AnchorHandle, AnchorRuntime};
pub use error::{Result, StoreError};
pub use holder::AnchorHolder;
pub use host::{Host, HostId, HostTag, concrete_type_of};
pub use lifecycle::{DetachBus, DetachHandler, LifecycleSignal};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    event_with_fields, json_kv,
};
pub use metrics::{StoreMetrics, StoreSnapshot};
pub use slot::{AnchorAttribute, SlotKind};
pub use store::AnchorStore;
