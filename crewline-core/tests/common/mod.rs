//! Shared test fixtures.
#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use crewline_core::{CountsSnapshot, Notification, NotificationKind};

/// An unread message notification with no group.
pub fn note(id: &str) -> Notification {
    Notification {
        id: id.to_string(),
        kind: NotificationKind::Message,
        title: format!("title {}", id),
        message: format!("message {}", id),
        group_id: None,
        sender_id: None,
        read: false,
        created_at: "2026-02-11T09:30:00Z".to_string(),
    }
}

/// An unread notification scoped to a group.
pub fn group_note(id: &str, group_id: &str, kind: NotificationKind) -> Notification {
    Notification {
        group_id: Some(group_id.to_string()),
        kind,
        ..note(id)
    }
}

/// Builds a counter snapshot from (group, kind, count) entries.
pub fn counts(entries: &[(&str, NotificationKind, u64)]) -> CountsSnapshot {
    let mut snapshot = CountsSnapshot::new();
    for (group, kind, count) in entries {
        snapshot
            .entry(group.to_string())
            .or_insert_with(HashMap::new)
            .insert(*kind, *count);
    }
    snapshot
}

/// Routes engine logs into the test harness output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Spins (in virtual time) until the condition holds.
///
/// Panics if the condition is still false after two simulated minutes.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..120_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}
