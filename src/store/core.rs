use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::json;

use crate::anchor::AnchorRuntime;
use crate::error::{Result, StoreError};
use crate::holder::AnchorHolder;
use crate::host::{Host, HostId, concrete_type_of};
use crate::lifecycle::{DetachHandler, LifecycleSignal};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{StoreMetrics, StoreSnapshot};
use crate::slot::SlotKind;

const LOG_TARGET: &str = "anchorage::store";

struct StoreInner {
    holders: HashMap<HostId, AnchorHolder>,
    hooked_types: HashSet<TypeId>,
    metrics: StoreMetrics,
}

/// Registry mapping host identity to its [`AnchorHolder`].
///
/// The store is a cheap-to-clone handle; all clones share one registry.
/// Collaborators are injected at construction: the [`AnchorRuntime`] every
/// holder uses for batch activation, and the [`LifecycleSignal`] through
/// which detachment handlers are installed once per host type.
///
/// All operations are single-threaded-affine. The store takes no locks and
/// expects every call, lifecycle callbacks included, on one execution
/// context; calling back into the store from inside a `with_slots` action
/// violates that contract and panics on the interior borrow.
#[derive(Clone)]
pub struct AnchorStore {
    inner: Rc<RefCell<StoreInner>>,
    runtime: Rc<dyn AnchorRuntime>,
    signal: Rc<dyn LifecycleSignal>,
    logger: Option<Logger>,
}

impl AnchorStore {
    pub fn new(runtime: Rc<dyn AnchorRuntime>, signal: Rc<dyn LifecycleSignal>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                holders: HashMap::new(),
                hooked_types: HashSet::new(),
                metrics: StoreMetrics::new(),
            })),
            runtime,
            signal,
            logger: None,
        }
    }

    /// Attach a structured logger for store lifecycle events.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Expose the holder bound to `host`, creating it on first access.
    ///
    /// The holder is handed to `action` in place, so its mutations persist.
    /// First creation for a host whose concrete type has not been seen yet
    /// also installs the detachment handler for that type, exactly once per
    /// type regardless of how many hosts share it.
    pub fn with_slots<R>(&self, host: &dyn Host, action: impl FnOnce(&mut AnchorHolder) -> R) -> R {
        let host_id = host.identity();
        if !self.inner.borrow().holders.contains_key(&host_id) {
            self.register_holder(&host_id, concrete_type_of(host));
        }

        let mut inner = self.inner.borrow_mut();
        let holder = inner
            .holders
            .entry(host_id)
            .or_insert_with(|| AnchorHolder::new(self.runtime.clone()));
        action(holder)
    }

    /// Remove the holder bound to `host`. Absent holders are a no-op.
    ///
    /// Every occupant must already be inactive: the first active occupant,
    /// scanned in declaration order, aborts the removal and the holder stays
    /// registered. The lifecycle-triggered teardown never trips this guard
    /// because it deactivates everything first.
    pub fn clear_all_slots(&self, host: &dyn Host) -> Result<()> {
        let host_id = host.identity();
        {
            let mut inner = self.inner.borrow_mut();
            let Some(holder) = inner.holders.get(&host_id) else {
                return Ok(());
            };
            for kind in SlotKind::ALL {
                if holder.get(kind).is_some_and(|anchor| anchor.is_active()) {
                    return Err(StoreError::RemovalWithActiveAnchor {
                        host: host_id,
                        kind,
                    });
                }
            }
            inner.holders.remove(&host_id);
            inner.metrics.record_holder_removed();
        }
        self.emit(
            LogLevel::Info,
            "holder_removed",
            [json_kv("host", json!(host_id))],
        );
        Ok(())
    }

    /// Whether a holder is currently registered for `host`.
    pub fn contains(&self, host: &dyn Host) -> bool {
        self.inner.borrow().holders.contains_key(&host.identity())
    }

    /// Number of live holders.
    pub fn len(&self) -> usize {
        self.inner.borrow().holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics_snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.borrow();
        inner.metrics.snapshot(inner.holders.len())
    }

    fn register_holder(&self, host_id: &HostId, host_type: TypeId) {
        let hook_needed = {
            let mut inner = self.inner.borrow_mut();
            inner
                .holders
                .insert(host_id.clone(), AnchorHolder::new(self.runtime.clone()));
            inner.metrics.record_holder_created();
            inner.hooked_types.insert(host_type)
        };
        self.emit(
            LogLevel::Debug,
            "holder_created",
            [json_kv("host", json!(host_id.clone()))],
        );

        if hook_needed {
            self.signal.install(host_type, self.detach_handler());
            self.inner.borrow_mut().metrics.record_hook_installed();
            self.emit(
                LogLevel::Debug,
                "lifecycle_hook_installed",
                [json_kv("host_type", json!(format!("{host_type:?}")))],
            );
        }
    }

    /// Teardown path run when a hooked host detaches: deactivate every
    /// occupant, then drop the holder. Holding only a weak reference keeps
    /// the signal implementation from pinning the registry alive.
    fn detach_handler(&self) -> DetachHandler {
        let inner = Rc::downgrade(&self.inner);
        let logger = self.logger.clone();
        Rc::new(move |host: &dyn Host| {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let host_id = host.identity();
            let deactivated = {
                let mut inner = inner.borrow_mut();
                let Some(holder) = inner.holders.get(&host_id) else {
                    return;
                };
                let deactivated = holder.deactivate_all();
                inner.holders.remove(&host_id);
                inner.metrics.record_auto_teardown();
                deactivated
            };
            if let Some(logger) = &logger {
                let event = event_with_fields(
                    LogLevel::Info,
                    LOG_TARGET,
                    "auto_teardown",
                    [
                        json_kv("host", json!(host_id)),
                        json_kv("deactivated", json!(deactivated.len())),
                        json_kv("kinds", json!(deactivated)),
                    ],
                );
                let _ = logger.log_event(event);
            }
        })
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::cell::Cell;

    use crate::anchor::{Anchor, AnchorHandle};
    use crate::host::HostTag;
    use crate::lifecycle::DetachBus;
    use crate::slot::AnchorAttribute;

    struct StubAnchor {
        attribute: AnchorAttribute,
        active: Cell<bool>,
    }

    impl StubAnchor {
        fn handle(attribute: AnchorAttribute) -> AnchorHandle {
            Rc::new(Self {
                attribute,
                active: Cell::new(false),
            })
        }
    }

    impl Anchor for StubAnchor {
        fn attribute(&self) -> AnchorAttribute {
            self.attribute
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    struct StubRuntime;

    impl AnchorRuntime for StubRuntime {
        fn activate(&self, anchors: &[AnchorHandle]) {
            set_all(anchors, true);
        }

        fn deactivate(&self, anchors: &[AnchorHandle]) {
            set_all(anchors, false);
        }
    }

    fn set_all(anchors: &[AnchorHandle], active: bool) {
        for anchor in anchors {
            let any: &dyn Any = anchor.as_ref();
            any.downcast_ref::<StubAnchor>().unwrap().active.set(active);
        }
    }

    struct Widget {
        tag: HostTag,
    }

    impl Widget {
        fn new() -> Self {
            Self {
                tag: HostTag::new(),
            }
        }
    }

    impl Host for Widget {
        fn identity(&self) -> HostId {
            self.tag.resolve()
        }
    }

    struct Panel {
        tag: HostTag,
    }

    impl Panel {
        fn new() -> Self {
            Self {
                tag: HostTag::new(),
            }
        }
    }

    impl Host for Panel {
        fn identity(&self) -> HostId {
            self.tag.resolve()
        }
    }

    fn store_with_bus() -> (AnchorStore, Rc<DetachBus>) {
        let bus = Rc::new(DetachBus::new());
        let store = AnchorStore::new(Rc::new(StubRuntime), bus.clone());
        (store, bus)
    }

    #[test]
    fn holder_mutations_persist_across_accesses() {
        let (store, _bus) = store_with_bus();
        let widget = Widget::new();

        store.with_slots(&widget, |holder| {
            holder.set_width(Some(StubAnchor::handle(AnchorAttribute::Width)))
        })
        .unwrap();

        let occupied = store.with_slots(&widget, |holder| holder.width().is_some());
        assert!(occupied);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn identity_is_stable_across_lookups() {
        let widget = Widget::new();
        let first = widget.identity();
        assert_eq!(widget.identity(), first);

        let other = Widget::new();
        assert_ne!(other.identity(), first);
    }

    #[test]
    fn distinct_hosts_get_distinct_holders() {
        let (store, _bus) = store_with_bus();
        let a = Widget::new();
        let b = Widget::new();

        store.with_slots(&a, |holder| {
            holder.set_top(Some(StubAnchor::handle(AnchorAttribute::Top)))
        })
        .unwrap();

        let b_empty = store.with_slots(&b, |holder| holder.all().is_empty());
        assert!(b_empty);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn hook_installs_once_per_host_type() {
        let (store, bus) = store_with_bus();
        let widgets: Vec<Widget> = (0..1000).map(|_| Widget::new()).collect();
        for widget in &widgets {
            store.with_slots(widget, |_holder| {});
        }
        assert_eq!(bus.installed_types(), 1);
        assert_eq!(store.metrics_snapshot().hooks_installed, 1);

        store.with_slots(&Panel::new(), |_holder| {});
        assert_eq!(bus.installed_types(), 2);
    }

    #[test]
    fn detach_deactivates_and_drops_the_holder() {
        let (store, bus) = store_with_bus();
        let widget = Widget::new();
        let top = StubAnchor::handle(AnchorAttribute::Top);
        let width = StubAnchor::handle(AnchorAttribute::Width);
        let height = StubAnchor::handle(AnchorAttribute::Height);

        store.with_slots(&widget, |holder| {
            holder.set_top(Some(top.clone()))?;
            holder.set_width(Some(width.clone()))?;
            holder.set_height(Some(height.clone()))?;
            holder.activate(&[SlotKind::Top, SlotKind::Width, SlotKind::Height])
        })
        .unwrap();
        assert!(top.is_active() && width.is_active() && height.is_active());

        bus.notify_detached(&widget);

        assert!(!store.contains(&widget));
        assert!(store.is_empty());
        assert!(!top.is_active());
        assert!(!width.is_active());
        assert!(!height.is_active());
        assert_eq!(store.metrics_snapshot().auto_teardowns, 1);
    }

    #[test]
    fn detach_of_untracked_host_is_noop() {
        let (store, bus) = store_with_bus();
        let tracked = Widget::new();
        store.with_slots(&tracked, |_holder| {});

        // Same type, never registered: the handler exists but finds nothing.
        bus.notify_detached(&Widget::new());
        assert_eq!(store.len(), 1);
        assert_eq!(store.metrics_snapshot().auto_teardowns, 0);
    }

    #[test]
    fn manual_removal_with_active_anchor_is_refused() {
        let (store, _bus) = store_with_bus();
        let widget = Widget::new();

        store.with_slots(&widget, |holder| {
            holder.set_width(Some(StubAnchor::handle(AnchorAttribute::Width)))?;
            holder.activate(&[SlotKind::Width])
        })
        .unwrap();

        let err = store.clear_all_slots(&widget).unwrap_err();
        assert!(matches!(
            err,
            StoreError::RemovalWithActiveAnchor {
                kind: SlotKind::Width,
                ..
            }
        ));
        assert!(store.contains(&widget));
    }

    #[test]
    fn manual_removal_succeeds_once_everything_is_inactive() {
        let (store, _bus) = store_with_bus();
        let widget = Widget::new();

        store.with_slots(&widget, |holder| {
            holder.set_width(Some(StubAnchor::handle(AnchorAttribute::Width)))?;
            holder.activate(&[SlotKind::Width])?;
            holder.deactivate(&[SlotKind::Width])
        })
        .unwrap();

        store.clear_all_slots(&widget).unwrap();
        assert!(!store.contains(&widget));
        assert_eq!(store.metrics_snapshot().holders_removed, 1);
    }

    #[test]
    fn removal_of_unknown_host_is_noop() {
        let (store, _bus) = store_with_bus();
        store.clear_all_slots(&Widget::new()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn slot_lifecycle_scenario() {
        let (store, _bus) = store_with_bus();
        let widget = Widget::new();
        let anchor = StubAnchor::handle(AnchorAttribute::Width);

        store.with_slots(&widget, |holder| {
            holder.set_width(Some(anchor.clone()))?;
            holder.activate(&[SlotKind::Width])
        })
        .unwrap();
        assert!(anchor.is_active());

        let blocked = store.with_slots(&widget, |holder| holder.set_width(None));
        assert!(matches!(
            blocked,
            Err(StoreError::BlockedByActiveAnchor {
                kind: SlotKind::Width
            })
        ));

        store.with_slots(&widget, |holder| {
            holder.deactivate(&[SlotKind::Width])?;
            holder.set_width(None)
        })
        .unwrap();

        let empty = store.with_slots(&widget, |holder| holder.width().is_none());
        assert!(empty);
    }

    #[test]
    fn metrics_snapshot_tracks_store_activity() {
        let (store, bus) = store_with_bus();
        let a = Widget::new();
        let b = Widget::new();
        store.with_slots(&a, |_holder| {});
        store.with_slots(&b, |_holder| {});
        bus.notify_detached(&a);
        store.clear_all_slots(&b).unwrap();

        let snapshot = store.metrics_snapshot();
        assert_eq!(snapshot.live_holders, 0);
        assert_eq!(snapshot.holders_created, 2);
        assert_eq!(snapshot.holders_removed, 2);
        assert_eq!(snapshot.auto_teardowns, 1);
        assert_eq!(snapshot.hooks_installed, 1);
    }
}
