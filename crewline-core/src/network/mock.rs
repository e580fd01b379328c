//! Mock Backend
//!
//! Scripted in-memory backend for tests and demos. Every request can be
//! held and released to exercise teardown races, poll outcomes are scripted
//! per call, and the push stream is fed line by line from the test.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::mpsc::{self, UnboundedSender};
use tokio::sync::watch;
use uuid::Uuid;

use super::backend::{ByteChunks, NotificationBackend, PollOutcome};
use super::error::NetworkError;
use crate::notifications::{CountsSnapshot, NewNotification, Notification, NotificationKind};

/// Scripted outcome for one long-poll call.
#[derive(Debug, Clone)]
pub enum MockPoll {
    /// HTTP 200 with a batch.
    Data(Vec<Notification>),
    /// HTTP 204.
    Empty,
    /// Network/server failure with this status.
    Fail(u16),
}

struct MockInner {
    notifications: Mutex<Vec<Notification>>,
    counts: Mutex<CountsSnapshot>,
    queued_counts: Mutex<VecDeque<CountsSnapshot>>,
    poll_script: Mutex<VecDeque<MockPoll>>,
    poll_calls: Mutex<Vec<tokio::time::Instant>>,
    stream_tx: Mutex<Option<UnboundedSender<Result<Vec<u8>, NetworkError>>>>,
    stream_connect_errors: Mutex<VecDeque<u16>>,
    stream_opens: AtomicUsize,
    marked_read: Mutex<Vec<String>>,
    mark_all_calls: AtomicUsize,
    marked_groups: Mutex<Vec<(String, Option<NotificationKind>)>>,
    created: Mutex<Vec<Notification>>,
    counts_fetches: AtomicUsize,
    fail_writes: AtomicBool,
    fail_fetches: AtomicBool,
    hold_tx: watch::Sender<bool>,
    hold_rx: watch::Receiver<bool>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable handle to a shared scripted backend.
#[derive(Clone)]
pub struct MockBackend {
    inner: Arc<MockInner>,
}

impl Default for MockBackend {
    fn default() -> Self {
        MockBackend::new()
    }
}

impl MockBackend {
    /// Creates an empty backend with nothing scripted.
    pub fn new() -> Self {
        let (hold_tx, hold_rx) = watch::channel(false);
        MockBackend {
            inner: Arc::new(MockInner {
                notifications: Mutex::new(Vec::new()),
                counts: Mutex::new(CountsSnapshot::new()),
                queued_counts: Mutex::new(VecDeque::new()),
                poll_script: Mutex::new(VecDeque::new()),
                poll_calls: Mutex::new(Vec::new()),
                stream_tx: Mutex::new(None),
                stream_connect_errors: Mutex::new(VecDeque::new()),
                stream_opens: AtomicUsize::new(0),
                marked_read: Mutex::new(Vec::new()),
                mark_all_calls: AtomicUsize::new(0),
                marked_groups: Mutex::new(Vec::new()),
                created: Mutex::new(Vec::new()),
                counts_fetches: AtomicUsize::new(0),
                fail_writes: AtomicBool::new(false),
                fail_fetches: AtomicBool::new(false),
                hold_tx,
                hold_rx,
            }),
        }
    }

    // === Scripting ===

    /// Sets the list returned by `fetch_notifications`.
    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        *lock(&self.inner.notifications) = notifications;
    }

    /// Sets the current counter snapshot.
    pub fn set_counts(&self, counts: CountsSnapshot) {
        *lock(&self.inner.counts) = counts;
    }

    /// Queues a snapshot to become current on the next `fetch_counts`.
    pub fn queue_counts(&self, counts: CountsSnapshot) {
        lock(&self.inner.queued_counts).push_back(counts);
    }

    /// Appends one scripted poll outcome. With an empty script, `poll`
    /// parks forever.
    pub fn queue_poll(&self, outcome: MockPoll) {
        lock(&self.inner.poll_script).push_back(outcome);
    }

    /// Makes every mutation call fail with HTTP 500.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every fetch call fail with HTTP 500.
    pub fn fail_fetches(&self, fail: bool) {
        self.inner.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Holds every request until released; in-flight requests park at the
    /// gate.
    pub fn hold_responses(&self, hold: bool) {
        let _ = self.inner.hold_tx.send(hold);
    }

    /// Fails the next `open_stream` with this status.
    pub fn fail_next_stream_open(&self, status: u16) {
        lock(&self.inner.stream_connect_errors).push_back(status);
    }

    /// Feeds one line (newline appended) into the active push stream.
    ///
    /// Returns false if no stream is open.
    pub fn push_stream_line(&self, line: &str) -> bool {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.push_stream_bytes(bytes)
    }

    /// Feeds raw bytes into the active push stream.
    pub fn push_stream_bytes(&self, bytes: Vec<u8>) -> bool {
        match lock(&self.inner.stream_tx).as_ref() {
            Some(tx) => tx.unbounded_send(Ok(bytes)).is_ok(),
            None => false,
        }
    }

    /// Closes the active push stream, as if the server dropped it.
    pub fn close_stream(&self) {
        lock(&self.inner.stream_tx).take();
    }

    // === Inspection ===

    /// Ids passed to `mark_read`, in call order.
    pub fn marked_read(&self) -> Vec<String> {
        lock(&self.inner.marked_read).clone()
    }

    /// Number of `mark_all_read` calls.
    pub fn mark_all_calls(&self) -> usize {
        self.inner.mark_all_calls.load(Ordering::SeqCst)
    }

    /// Arguments passed to `mark_group_read`, in call order.
    pub fn marked_groups(&self) -> Vec<(String, Option<NotificationKind>)> {
        lock(&self.inner.marked_groups).clone()
    }

    /// Records created through this backend.
    pub fn created(&self) -> Vec<Notification> {
        lock(&self.inner.created).clone()
    }

    /// Instant of every `poll` call.
    pub fn poll_calls(&self) -> Vec<tokio::time::Instant> {
        lock(&self.inner.poll_calls).clone()
    }

    /// Number of `fetch_counts` calls.
    pub fn counts_fetches(&self) -> usize {
        self.inner.counts_fetches.load(Ordering::SeqCst)
    }

    /// Number of `open_stream` calls.
    pub fn stream_opens(&self) -> usize {
        self.inner.stream_opens.load(Ordering::SeqCst)
    }

    async fn wait_if_held(&self) {
        let mut rx = self.inner.hold_rx.clone();
        while *rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    fn check_write(&self) -> Result<(), NetworkError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(NetworkError::Http(500));
        }
        Ok(())
    }

    fn check_fetch(&self) -> Result<(), NetworkError> {
        if self.inner.fail_fetches.load(Ordering::SeqCst) {
            return Err(NetworkError::Http(500));
        }
        Ok(())
    }
}

impl NotificationBackend for MockBackend {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, NetworkError> {
        self.wait_if_held().await;
        self.check_fetch()?;
        Ok(lock(&self.inner.notifications).clone())
    }

    async fn fetch_counts(&self) -> Result<CountsSnapshot, NetworkError> {
        self.wait_if_held().await;
        self.check_fetch()?;
        self.inner.counts_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = lock(&self.inner.queued_counts).pop_front() {
            *lock(&self.inner.counts) = next;
        }
        Ok(lock(&self.inner.counts).clone())
    }

    async fn mark_read(&self, id: &str) -> Result<(), NetworkError> {
        self.wait_if_held().await;
        self.check_write()?;
        lock(&self.inner.marked_read).push(id.to_string());
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), NetworkError> {
        self.wait_if_held().await;
        self.check_write()?;
        self.inner.mark_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn mark_group_read(
        &self,
        group_id: &str,
        kind: Option<NotificationKind>,
    ) -> Result<(), NetworkError> {
        self.wait_if_held().await;
        self.check_write()?;
        lock(&self.inner.marked_groups).push((group_id.to_string(), kind));
        Ok(())
    }

    async fn create(&self, new: &NewNotification) -> Result<Notification, NetworkError> {
        self.wait_if_held().await;
        self.check_write()?;
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            title: new.title.clone(),
            message: new.message.clone(),
            group_id: new.group_id.clone(),
            sender_id: None,
            read: false,
            created_at: "2026-02-11T09:30:00Z".to_string(),
        };
        lock(&self.inner.created).push(notification.clone());
        Ok(notification)
    }

    async fn open_stream(&self) -> Result<ByteChunks, NetworkError> {
        self.wait_if_held().await;
        self.inner.stream_opens.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = lock(&self.inner.stream_connect_errors).pop_front() {
            return Err(NetworkError::Http(status));
        }
        let (tx, rx) = mpsc::unbounded();
        *lock(&self.inner.stream_tx) = Some(tx);
        Ok(Box::pin(rx))
    }

    async fn poll(&self) -> Result<PollOutcome, NetworkError> {
        lock(&self.inner.poll_calls).push(tokio::time::Instant::now());
        self.wait_if_held().await;
        let scripted = lock(&self.inner.poll_script).pop_front();
        match scripted {
            Some(MockPoll::Data(batch)) => Ok(PollOutcome::Data(batch)),
            Some(MockPoll::Empty) => Ok(PollOutcome::Empty),
            Some(MockPoll::Fail(status)) => Err(NetworkError::Http(status)),
            None => {
                // Script exhausted: behave like a server holding forever.
                futures::future::pending::<()>().await;
                Ok(PollOutcome::Empty)
            }
        }
    }
}
