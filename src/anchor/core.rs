use std::any::Any;
use std::rc::Rc;

use crate::slot::{AnchorAttribute, SlotKind};

/// Opaque token for one concrete layout relationship.
///
/// The crate only ever reads an anchor: its attribute, to classify it into a
/// slot, and its activation state, to enforce the mutation and removal
/// guards. Activation is governed externally and changes only through the
/// [`AnchorRuntime`] batch primitives. The `Any` supertrait lets runtime
/// adapters downcast handles back to their concrete anchor type.
pub trait Anchor: Any {
    /// The layout attribute this anchor constrains.
    fn attribute(&self) -> AnchorAttribute;

    /// Whether the anchor is currently engaged by the layout backend.
    fn is_active(&self) -> bool;

    /// Slot classification derived from the anchor's own attribute. `None`
    /// means the attribute falls outside the slot vocabulary and the anchor
    /// may occupy any slot.
    fn kind(&self) -> Option<SlotKind> {
        SlotKind::from_attribute(self.attribute())
    }
}

/// Shared handle to an anchor. Handles compare by reference identity
/// ([`Rc::ptr_eq`]), matching the reverse lookups holders perform.
pub type AnchorHandle = Rc<dyn Anchor>;

/// Batch activation primitive supplied by the layout backend.
///
/// Each call covers the whole batch; holders never issue partial batches.
pub trait AnchorRuntime {
    fn activate(&self, anchors: &[AnchorHandle]);
    fn deactivate(&self, anchors: &[AnchorHandle]);
}
