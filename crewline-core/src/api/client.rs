// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification Client
//!
//! Main entry point for the notification engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::config::{ClientConfig, TransportKind};
use super::error::{ClientError, ClientResult};
use super::events::{CallbackHandler, EventHandler, NotifyEvent};
use crate::network::{
    ConnectionState, HttpBackend, LongPollTransport, MockBackend, NetworkError,
    NotificationBackend, NotificationTransport, StreamTransport, SyncShared,
};
use crate::notifications::{NewNotification, Notification, NotificationKind};

/// Facade over the notification sync engine.
///
/// Coordinates:
/// - Initial state bootstrap (full fetch + counter snapshot)
/// - The single active transport
/// - Optimistic mutations with write-through and counter refetch
/// - Event dispatching to observers
///
/// # Example
///
/// ```ignore
/// use crewline_core::api::{ClientConfig, NotificationClient, TransportKind};
///
/// let config = ClientConfig::new("https://app.crewline.dev", "user-7")
///     .with_transport(TransportKind::LongPoll);
/// let mut client = NotificationClient::new(config)?;
///
/// client.on_event(|event| println!("event: {:?}", event));
/// client.bootstrap().await?;
///
/// client.mark_as_read("notif-42").await?;
/// println!("{} unread", client.unread_count());
///
/// client.teardown();
/// ```
pub struct NotificationClient<B: NotificationBackend = MockBackend> {
    config: ClientConfig,
    shared: Arc<SyncShared<B>>,
    transport: Option<Box<dyn NotificationTransport>>,
    started: bool,
    loading: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl NotificationClient<HttpBackend> {
    /// Creates a client over the real HTTP backend.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        if config.http.server_url.is_empty() {
            return Err(ClientError::Configuration(
                "server_url must be set".to_string(),
            ));
        }
        let backend = HttpBackend::new(&config.http)?;
        Ok(Self::with_backend(config, backend))
    }
}

impl NotificationClient<MockBackend> {
    /// Creates a client over a scripted mock backend (for testing).
    pub fn with_mock(config: ClientConfig, backend: MockBackend) -> Self {
        Self::with_backend(config, backend)
    }
}

impl<B: NotificationBackend> NotificationClient<B> {
    /// Creates a client over any backend implementation.
    pub fn with_backend(config: ClientConfig, backend: B) -> Self {
        NotificationClient {
            config,
            shared: Arc::new(SyncShared::new(backend)),
            transport: None,
            started: false,
            loading: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    // === Lifecycle ===

    /// Loads the initial state and starts the configured transport.
    ///
    /// Idempotent while running: a second call (mount/subscription churn) is
    /// a logged no-op until `teardown` re-arms it. On a failed initial fetch
    /// nothing is started and the call may simply be repeated.
    pub async fn bootstrap(&mut self) -> ClientResult<()> {
        if self.started {
            log::debug!("bootstrap called while running; ignoring");
            return Ok(());
        }

        self.shared.revive();
        self.loading.store(true, Ordering::SeqCst);
        let loaded = self.load_initial().await;
        self.loading.store(false, Ordering::SeqCst);
        loaded?;

        self.start_transport();
        self.started = true;
        Ok(())
    }

    /// Stops the active transport and drops the liveness flag.
    ///
    /// A response still in flight when this runs can no longer mutate the
    /// store. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        // Flag first: anything the abort races past is dropped at delivery.
        self.shared.shutdown();
        if let Some(mut transport) = self.transport.take() {
            transport.stop();
        }
        self.started = false;
    }

    /// Tears the transport down and starts a fresh one.
    ///
    /// The external recovery path once the stream transport has given up.
    pub fn restart(&mut self) -> ClientResult<()> {
        if !self.started {
            return Err(ClientError::InvalidState(
                "restart before bootstrap".to_string(),
            ));
        }
        if let Some(mut transport) = self.transport.take() {
            transport.stop();
        }
        self.shared.revive();
        self.start_transport();
        Ok(())
    }

    fn start_transport(&mut self) {
        let mut transport: Box<dyn NotificationTransport> = match self.config.transport {
            TransportKind::Stream => Box::new(StreamTransport::new(
                self.shared.clone(),
                self.config.reconnect.clone(),
            )),
            TransportKind::LongPoll => Box::new(LongPollTransport::new(
                self.shared.clone(),
                self.config.poll_retry_delay,
            )),
        };
        transport.start();
        self.transport = Some(transport);
    }

    async fn load_initial(&self) -> ClientResult<()> {
        let notifications = self
            .shared
            .backend()
            .fetch_notifications()
            .await
            .map_err(|e| self.record_failure(e))?;
        self.shared.load_notifications(notifications);

        let counts = self
            .shared
            .backend()
            .fetch_counts()
            .await
            .map_err(|e| self.record_failure(e))?;
        self.shared.replace_counts(counts);

        self.clear_error();
        Ok(())
    }

    // === Mutations ===

    /// Marks one notification read: optimistic local flip, server write,
    /// counter refetch.
    ///
    /// A failed write leaves the local flip in place (no rollback); the
    /// failure surfaces through `last_error` and an error event.
    pub async fn mark_as_read(&self, id: &str) -> ClientResult<()> {
        self.shared.mark_read_local(id);
        let write = self.shared.backend().mark_read(id).await;
        self.shared.refresh_counts().await;
        write.map_err(|e| self.record_failure(e))
    }

    /// Marks every notification read. Same optimistic pattern as
    /// `mark_as_read`.
    pub async fn mark_all_as_read(&self) -> ClientResult<()> {
        self.shared.mark_all_read_local();
        let write = self.shared.backend().mark_all_read().await;
        self.shared.refresh_counts().await;
        write.map_err(|e| self.record_failure(e))
    }

    /// Marks a group (optionally one kind) read. Same optimistic pattern as
    /// `mark_as_read`.
    pub async fn mark_group_as_read(
        &self,
        group_id: &str,
        kind: Option<NotificationKind>,
    ) -> ClientResult<()> {
        self.shared.mark_group_read_local(group_id, kind);
        let write = self.shared.backend().mark_group_read(group_id, kind).await;
        self.shared.refresh_counts().await;
        write.map_err(|e| self.record_failure(e))
    }

    /// Creates a notification server-side.
    ///
    /// The stored record is surfaced locally only when the caller is the
    /// recipient: `target_user_id` absent or equal to the configured user.
    pub async fn create_notification(&self, new: NewNotification) -> ClientResult<Notification> {
        let created = self
            .shared
            .backend()
            .create(&new)
            .await
            .map_err(|e| self.record_failure(e))?;

        let for_self = new
            .target_user_id
            .as_deref()
            .map_or(true, |target| target == self.config.user_id);
        if for_self {
            self.shared.deliver(created.clone());
            self.shared.refresh_counts().await;
        }
        Ok(created)
    }

    // === On-demand fetches ===

    /// Refetches the full notification list, replacing the store.
    pub async fn fetch_notifications(&self) -> ClientResult<Vec<Notification>> {
        self.loading.store(true, Ordering::SeqCst);
        let fetched = self.shared.backend().fetch_notifications().await;
        self.loading.store(false, Ordering::SeqCst);

        let notifications = fetched.map_err(|e| self.record_failure(e))?;
        self.shared.load_notifications(notifications);
        self.clear_error();
        Ok(self.shared.notifications())
    }

    /// Refetches the unread counter snapshot, replacing the index.
    pub async fn fetch_unread_counts(&self) -> ClientResult<()> {
        let counts = self
            .shared
            .backend()
            .fetch_counts()
            .await
            .map_err(|e| self.record_failure(e))?;
        self.shared.replace_counts(counts);
        Ok(())
    }

    /// Manual refresh: full list plus counter snapshot.
    pub async fn refresh(&self) -> ClientResult<()> {
        self.fetch_notifications().await?;
        self.fetch_unread_counts().await
    }

    // === Observers ===

    /// Adds an event handler.
    pub fn add_event_handler(&self, handler: Arc<dyn EventHandler>) {
        self.shared.events().add_handler(handler);
    }

    /// Adds a closure as an event handler.
    pub fn on_event<F>(&self, callback: F)
    where
        F: Fn(NotifyEvent) + Send + Sync + 'static,
    {
        self.add_event_handler(Arc::new(CallbackHandler::new(callback)));
    }

    // === Reads ===

    /// Current records, most-recent-first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.shared.notifications()
    }

    /// Total unread count from the counter snapshot.
    pub fn unread_count(&self) -> u64 {
        self.shared.unread_count()
    }

    /// Unread count for one group, optionally one kind.
    pub fn unread_count_for_group(&self, group_id: &str, kind: Option<NotificationKind>) -> u64 {
        self.shared.unread_count_for_group(group_id, kind)
    }

    /// Returns true while an initial or on-demand fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current transport connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.shared.connection_state()
    }

    /// Returns true after a successful bootstrap, until teardown.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The backend serving this client.
    pub fn backend(&self) -> &B {
        self.shared.backend()
    }

    /// The shared sync state (for wiring custom transports in tests).
    pub fn shared(&self) -> &Arc<SyncShared<B>> {
        &self.shared
    }

    fn record_failure(&self, error: NetworkError) -> ClientError {
        let message = error.to_string();
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.clone());
        self.shared.report_error(&message);
        ClientError::Network(error)
    }

    fn clear_error(&self) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<B: NotificationBackend> Drop for NotificationClient<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
