use thiserror::Error;

use crate::host::HostId;
use crate::slot::SlotKind;

/// Unified result type for the anchorage crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Invariant violations raised by slot and store mutation.
///
/// Every variant marks a logic error in the calling code, not a runtime
/// condition. None of them is recovered internally and none is meant to be
/// caught, matched on, or retried: surface the error and stop.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot's occupant is still engaged; deactivate it before writing
    /// to the slot. Reassigning the identical handle is blocked too.
    #[error("`{kind}` slot holds an active anchor; deactivate it before replacing or clearing")]
    BlockedByActiveAnchor { kind: SlotKind },
    /// A classifiable anchor was filed under the wrong slot. The slot is
    /// left unchanged.
    #[error("anchor classifies as `{found}` and cannot occupy the `{expected}` slot")]
    SlotKindMismatch { expected: SlotKind, found: SlotKind },
    /// A batch operation referenced a slot with no occupant. Nothing in the
    /// batch was activated or deactivated.
    #[error("batch operation referenced the empty `{kind}` slot")]
    MissingAnchorForBatch { kind: SlotKind },
    /// Manual holder removal found an anchor still active; the holder stays
    /// registered. The lifecycle-triggered teardown never raises this.
    #[error("host `{host}` still has an active `{kind}` anchor; deactivate all anchors before removal")]
    RemovalWithActiveAnchor { host: HostId, kind: SlotKind },
}
