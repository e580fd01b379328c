// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared Sync State
//!
//! The single mutation owner for the notification store and the unread
//! counter index. Transports and the facade both funnel every mutation
//! through here, so dedup-insert and last-write-wins counter semantics hold
//! without fine-grained locking. Locks are never held across an await.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::backend::NotificationBackend;
use super::transport::ConnectionState;
use crate::api::events::{EventDispatcher, NotifyEvent};
use crate::notifications::{
    CountsSnapshot, Notification, NotificationKind, NotificationStore, UnreadCounters,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store, counters, dispatcher and backend behind one owner.
///
/// The liveness flag gates every transport-driven mutation: once `shutdown`
/// ran, a late response from an in-flight request cannot touch the store.
pub struct SyncShared<B> {
    backend: B,
    store: Mutex<NotificationStore>,
    counters: Mutex<UnreadCounters>,
    events: EventDispatcher,
    connection: Mutex<ConnectionState>,
    alive: AtomicBool,
}

impl<B: NotificationBackend> SyncShared<B> {
    /// Wraps a backend with empty local state.
    pub fn new(backend: B) -> Self {
        SyncShared {
            backend,
            store: Mutex::new(NotificationStore::new()),
            counters: Mutex::new(UnreadCounters::new()),
            events: EventDispatcher::new(),
            connection: Mutex::new(ConnectionState::Disconnected),
            alive: AtomicBool::new(true),
        }
    }

    /// The backend serving this client.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The observer dispatcher.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Returns false once `shutdown` ran.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Drops the liveness flag; late transport deliveries become no-ops.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Re-arms the liveness flag for a restart or re-bootstrap.
    pub fn revive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    // === Transport-driven mutations ===

    /// Inserts one live notification at the store head.
    ///
    /// No-op after shutdown and on duplicate ids. Returns whether the store
    /// changed.
    pub fn deliver(&self, notification: Notification) -> bool {
        if !self.is_alive() {
            return false;
        }
        let id = notification.id.clone();
        let inserted = lock(&self.store).add(notification);
        if inserted {
            self.events.dispatch(NotifyEvent::NotificationReceived { id });
        }
        inserted
    }

    /// Inserts a long-poll batch. Returns how many records were new.
    pub fn deliver_batch(&self, notifications: Vec<Notification>) -> usize {
        let mut inserted = 0;
        for notification in notifications {
            if self.deliver(notification) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Refetches the counter snapshot and replaces it wholesale.
    ///
    /// Failures are logged and swallowed; the counters just stay stale until
    /// the next refresh.
    pub async fn refresh_counts(&self) {
        match self.backend.fetch_counts().await {
            Ok(counts) => {
                if self.is_alive() {
                    self.replace_counts(counts);
                }
            }
            Err(e) => log::warn!("unread counter refresh failed: {}", e),
        }
    }

    /// Tracks the transport connection state, dispatching on change.
    pub fn set_connection_state(&self, state: ConnectionState) {
        let mut current = lock(&self.connection);
        if *current != state {
            *current = state;
            drop(current);
            self.events
                .dispatch(NotifyEvent::ConnectionStateChanged { state });
        }
    }

    /// Current transport connection state.
    pub fn connection_state(&self) -> ConnectionState {
        *lock(&self.connection)
    }

    // === Facade-driven mutations ===

    /// Replaces the whole store from a full fetch.
    pub fn load_notifications(&self, notifications: Vec<Notification>) {
        let count = notifications.len();
        lock(&self.store).replace_all(notifications);
        self.events
            .dispatch(NotifyEvent::NotificationsLoaded { count });
    }

    /// Replaces the counter snapshot.
    pub fn replace_counts(&self, counts: CountsSnapshot) {
        lock(&self.counters).replace(counts);
        self.events.dispatch(NotifyEvent::CountsUpdated);
    }

    /// Optimistically marks one record read.
    pub fn mark_read_local(&self, id: &str) -> bool {
        let changed = lock(&self.store).mark_read(id);
        if changed {
            self.events
                .dispatch(NotifyEvent::MarkedRead { id: id.to_string() });
        }
        changed
    }

    /// Optimistically marks everything read.
    pub fn mark_all_read_local(&self) -> usize {
        let changed = lock(&self.store).mark_all_read();
        if changed > 0 {
            self.events.dispatch(NotifyEvent::AllMarkedRead { changed });
        }
        changed
    }

    /// Optimistically marks a group (optionally one kind) read.
    pub fn mark_group_read_local(&self, group_id: &str, kind: Option<NotificationKind>) -> usize {
        let changed = lock(&self.store).mark_group_read(group_id, kind);
        if changed > 0 {
            self.events.dispatch(NotifyEvent::GroupMarkedRead {
                group_id: group_id.to_string(),
                changed,
            });
        }
        changed
    }

    /// Dispatches an error event to observers.
    pub fn report_error(&self, message: &str) {
        self.events.dispatch(NotifyEvent::Error {
            message: message.to_string(),
        });
    }

    // === Reads ===

    /// Clones the current records, most-recent-first.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.store).snapshot()
    }

    /// Number of stored records.
    pub fn store_len(&self) -> usize {
        lock(&self.store).len()
    }

    /// Total unread count from the counter snapshot.
    pub fn unread_count(&self) -> u64 {
        lock(&self.counters).total()
    }

    /// Unread count for one group, optionally one kind.
    pub fn unread_count_for_group(&self, group_id: &str, kind: Option<NotificationKind>) -> u64 {
        lock(&self.counters).get(group_id, kind)
    }
}
