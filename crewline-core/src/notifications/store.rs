// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification Store
//!
//! Deduplicated, insertion-ordered collection of notification records.
//! Live arrivals prepend (most-recent-first); bulk loads keep the order the
//! server returned.

use std::collections::HashSet;

use super::types::{Notification, NotificationKind};

/// In-memory notification collection with dedup by id.
///
/// Mutations return what actually changed so the single mutation owner can
/// decide which observer events to dispatch.
#[derive(Debug, Default)]
pub struct NotificationStore {
    records: Vec<Notification>,
    ids: HashSet<String>,
}

impl NotificationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        NotificationStore::default()
    }

    /// Inserts a record at the head iff its id is unseen.
    ///
    /// Returns true if the record was inserted, false on a duplicate id.
    pub fn add(&mut self, notification: Notification) -> bool {
        if !self.ids.insert(notification.id.clone()) {
            return false;
        }
        self.records.insert(0, notification);
        true
    }

    /// Replaces the whole collection with a server-ordered list.
    ///
    /// Keeps the first occurrence per id; later duplicates are dropped.
    pub fn replace_all(&mut self, notifications: Vec<Notification>) {
        self.records.clear();
        self.ids.clear();
        for notification in notifications {
            if self.ids.insert(notification.id.clone()) {
                self.records.push(notification);
            }
        }
    }

    /// Marks one record read. Returns true if the flag actually flipped.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    /// Marks every record read. Returns how many flipped.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.records.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }

    /// Marks a group's records read, optionally restricted to one kind.
    ///
    /// Only records with a matching `group_id` are touched. Returns how many
    /// flipped.
    pub fn mark_group_read(&mut self, group_id: &str, kind: Option<NotificationKind>) -> usize {
        let mut changed = 0;
        for n in self.records.iter_mut() {
            if n.read {
                continue;
            }
            if n.group_id.as_deref() != Some(group_id) {
                continue;
            }
            if let Some(kind) = kind {
                if n.kind != kind {
                    continue;
                }
            }
            n.read = true;
            changed += 1;
        }
        changed
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.records.iter().find(|n| n.id == id)
    }

    /// Returns true if a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Iterates records most-recent-first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.records.iter()
    }

    /// Clones the current records, most-recent-first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.records.clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records still unread.
    pub fn unread_len(&self) -> usize {
        self.records.iter().filter(|n| !n.read).count()
    }
}
