//! Store bookkeeping counters and loggable snapshots.

use serde_json::json;

use crate::logging::{LogEvent, LogFields, LogLevel};

/// Counters the store maintains across its lifetime.
///
/// `holders_removed` covers both manual removals and lifecycle-triggered
/// teardowns; `auto_teardowns` counts only the latter.
#[derive(Debug, Default, Clone)]
pub struct StoreMetrics {
    holders_created: u64,
    holders_removed: u64,
    auto_teardowns: u64,
    hooks_installed: u64,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_holder_created(&mut self) {
        self.holders_created = self.holders_created.saturating_add(1);
    }

    pub(crate) fn record_holder_removed(&mut self) {
        self.holders_removed = self.holders_removed.saturating_add(1);
    }

    pub(crate) fn record_auto_teardown(&mut self) {
        self.auto_teardowns = self.auto_teardowns.saturating_add(1);
        self.record_holder_removed();
    }

    pub(crate) fn record_hook_installed(&mut self) {
        self.hooks_installed = self.hooks_installed.saturating_add(1);
    }

    pub fn snapshot(&self, live_holders: usize) -> StoreSnapshot {
        StoreSnapshot {
            live_holders: live_holders as u64,
            holders_created: self.holders_created,
            holders_removed: self.holders_removed,
            auto_teardowns: self.auto_teardowns,
            hooks_installed: self.hooks_installed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub live_holders: u64,
    pub holders_created: u64,
    pub holders_removed: u64,
    pub auto_teardowns: u64,
    pub hooks_installed: u64,
}

impl StoreSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("live_holders".to_string(), json!(self.live_holders));
        map.insert("holders_created".to_string(), json!(self.holders_created));
        map.insert("holders_removed".to_string(), json!(self.holders_removed));
        map.insert("auto_teardowns".to_string(), json!(self.auto_teardowns));
        map.insert("hooks_installed".to_string(), json!(self.hooks_installed));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "store_metrics".to_string(),
            self.as_fields(),
        )
    }
}
