//! Unread Counter Index
//!
//! Per-group, per-kind unread counts, replaced wholesale from server
//! snapshots. The index is an independently-sourced snapshot, never derived
//! incrementally from the store; the two may disagree briefly until the next
//! refetch lands.

use std::collections::HashMap;

use super::types::NotificationKind;

/// Wire shape of a counter snapshot: groupId -> kind -> count.
pub type CountsSnapshot = HashMap<String, HashMap<NotificationKind, u64>>;

/// Last-write-wins unread counter index.
#[derive(Debug, Default)]
pub struct UnreadCounters {
    counts: CountsSnapshot,
}

impl UnreadCounters {
    /// Creates an empty index.
    pub fn new() -> Self {
        UnreadCounters::default()
    }

    /// Replaces the whole snapshot.
    pub fn replace(&mut self, counts: CountsSnapshot) {
        self.counts = counts;
    }

    /// Count for a group, restricted to one kind or summed over all kinds.
    ///
    /// Missing groups and kinds read as 0.
    pub fn get(&self, group_id: &str, kind: Option<NotificationKind>) -> u64 {
        let Some(group) = self.counts.get(group_id) else {
            return 0;
        };
        match kind {
            Some(kind) => group.get(&kind).copied().unwrap_or(0),
            None => group.values().sum(),
        }
    }

    /// Total unread count across every group and kind.
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|group| group.values()).sum()
    }

    /// Returns true if the snapshot holds no counts.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Borrows the current snapshot.
    pub fn snapshot(&self) -> &CountsSnapshot {
        &self.counts
    }
}
