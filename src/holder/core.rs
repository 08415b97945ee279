use std::collections::HashMap;
use std::rc::Rc;

use crate::anchor::{AnchorHandle, AnchorRuntime};
use crate::error::{Result, StoreError};
use crate::slot::SlotKind;

/// Per-host container filing at most one anchor per slot kind.
///
/// Writes go through [`AnchorHolder::set`], which guards the two slot
/// invariants: an active occupant blocks any write to its slot, and a
/// classifiable anchor can only occupy the slot matching its own attribute.
/// Batch activation hands the resolved anchors to the injected
/// [`AnchorRuntime`] as a single call.
pub struct AnchorHolder {
    slots: HashMap<SlotKind, AnchorHandle>,
    runtime: Rc<dyn AnchorRuntime>,
}

impl AnchorHolder {
    pub fn new(runtime: Rc<dyn AnchorRuntime>) -> Self {
        Self {
            slots: HashMap::new(),
            runtime,
        }
    }

    /// Occupant of `kind`, if any.
    pub fn get(&self, kind: SlotKind) -> Option<AnchorHandle> {
        self.slots.get(&kind).cloned()
    }

    /// Replace or clear the occupant of `kind`.
    ///
    /// An active occupant blocks the write outright, including reassignment
    /// of the very handle already in the slot; deactivate it first. A new
    /// anchor whose attribute classifies to a different kind is rejected;
    /// unclassifiable attributes are accepted into any slot. On error the
    /// slot is left unchanged.
    pub fn set(&mut self, kind: SlotKind, anchor: Option<AnchorHandle>) -> Result<()> {
        if let Some(current) = self.slots.get(&kind) {
            if current.is_active() {
                return Err(StoreError::BlockedByActiveAnchor { kind });
            }
        }
        if let Some(anchor) = &anchor {
            if let Some(found) = anchor.kind() {
                if found != kind {
                    return Err(StoreError::SlotKindMismatch {
                        expected: kind,
                        found,
                    });
                }
            }
        }

        match anchor {
            Some(anchor) => {
                self.slots.insert(kind, anchor);
            }
            None => {
                self.slots.remove(&kind);
            }
        }
        Ok(())
    }

    /// Every occupant, in no particular order.
    pub fn all(&self) -> Vec<AnchorHandle> {
        self.slots.values().cloned().collect()
    }

    /// Active occupants keyed by their slot.
    pub fn active(&self) -> HashMap<SlotKind, AnchorHandle> {
        self.slots
            .iter()
            .filter(|(_, anchor)| anchor.is_active())
            .map(|(kind, anchor)| (*kind, anchor.clone()))
            .collect()
    }

    /// Activate the occupants of `kinds` as one batch.
    ///
    /// All-or-nothing: if any kind has no occupant the whole batch is
    /// abandoned before the runtime sees it.
    pub fn activate(&self, kinds: &[SlotKind]) -> Result<()> {
        let anchors = self.resolve_batch(kinds)?;
        self.runtime.activate(&anchors);
        Ok(())
    }

    /// Deactivate the occupants of `kinds` as one batch, with the same
    /// all-or-nothing resolution as [`AnchorHolder::activate`].
    pub fn deactivate(&self, kinds: &[SlotKind]) -> Result<()> {
        let anchors = self.resolve_batch(kinds)?;
        self.runtime.deactivate(&anchors);
        Ok(())
    }

    /// Deactivate every active occupant in one batch; returns the slots
    /// that were swept, in declaration order.
    pub fn deactivate_all(&self) -> Vec<SlotKind> {
        let mut kinds = Vec::new();
        let mut anchors = Vec::new();
        for kind in SlotKind::ALL {
            if let Some(anchor) = self.slots.get(&kind) {
                if anchor.is_active() {
                    kinds.push(kind);
                    anchors.push(anchor.clone());
                }
            }
        }
        if !anchors.is_empty() {
            self.runtime.deactivate(&anchors);
        }
        kinds
    }

    /// Reverse lookup by handle identity, first match in declaration order.
    pub fn find_kind(&self, anchor: &AnchorHandle) -> Option<SlotKind> {
        SlotKind::ALL.iter().copied().find(|kind| {
            self.slots
                .get(kind)
                .is_some_and(|occupant| Rc::ptr_eq(occupant, anchor))
        })
    }

    fn resolve_batch(&self, kinds: &[SlotKind]) -> Result<Vec<AnchorHandle>> {
        kinds
            .iter()
            .map(|&kind| {
                self.get(kind)
                    .ok_or(StoreError::MissingAnchorForBatch { kind })
            })
            .collect()
    }
}

macro_rules! slot_accessors {
    ($($kind:ident => $get:ident / $set:ident),+ $(,)?) => {
        impl AnchorHolder {
            $(
                #[doc = concat!("Occupant of the `", stringify!($get), "` slot.")]
                pub fn $get(&self) -> Option<AnchorHandle> {
                    self.get(SlotKind::$kind)
                }

                #[doc = concat!("Replace or clear the `", stringify!($get), "` slot; see [`AnchorHolder::set`].")]
                pub fn $set(&mut self, anchor: Option<AnchorHandle>) -> Result<()> {
                    self.set(SlotKind::$kind, anchor)
                }
            )+
        }
    };
}

slot_accessors! {
    Left => left / set_left,
    Right => right / set_right,
    Top => top / set_top,
    Bottom => bottom / set_bottom,
    Leading => leading / set_leading,
    Trailing => trailing / set_trailing,
    CenterX => center_x / set_center_x,
    CenterY => center_y / set_center_y,
    Width => width / set_width,
    Height => height / set_height,
    Baseline => baseline / set_baseline,
}
