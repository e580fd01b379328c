// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Long-Poll Transport
//!
//! Strategy B: one blocking pull at a time. Data and empty outcomes trigger
//! the next pull immediately (the server's hold time is the only pacing);
//! failures wait a fixed delay. The delay is deliberately flat, in contrast
//! to the stream transport's exponential policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::backend::{NotificationBackend, PollOutcome};
use super::sync::SyncShared;
use super::transport::{ConnectionState, NotificationTransport};

/// Long-poll loop transport.
pub struct LongPollTransport<B> {
    shared: Arc<SyncShared<B>>,
    retry_delay: Duration,
    live: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<B: NotificationBackend> LongPollTransport<B> {
    /// Creates a transport over the shared sync state.
    pub fn new(shared: Arc<SyncShared<B>>, retry_delay: Duration) -> Self {
        LongPollTransport {
            shared,
            retry_delay,
            live: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl<B: NotificationBackend> NotificationTransport for LongPollTransport<B> {
    fn start(&mut self) {
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        self.live.store(true, Ordering::SeqCst);
        let shared = self.shared.clone();
        let live = self.live.clone();
        let retry_delay = self.retry_delay;
        self.handle = Some(tokio::spawn(run_poll(shared, live, retry_delay)));
    }

    fn stop(&mut self) {
        // Flag first, then abort: a response racing the abort still finds
        // the loop unwilling to reschedule.
        self.live.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.shared.set_connection_state(ConnectionState::Disconnected);
    }

    fn state(&self) -> ConnectionState {
        self.shared.connection_state()
    }

    fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<B> Drop for LongPollTransport<B> {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Explicit pull loop gated on the liveness flag.
///
/// The flag is re-checked before every pull and after every delay; a loop
/// that skipped that check would keep polling as a zombie after teardown.
async fn run_poll<B: NotificationBackend>(
    shared: Arc<SyncShared<B>>,
    live: Arc<AtomicBool>,
    retry_delay: Duration,
) {
    shared.set_connection_state(ConnectionState::Connecting);

    while live.load(Ordering::SeqCst) {
        match shared.backend().poll().await {
            Ok(outcome) => {
                shared.set_connection_state(ConnectionState::Connected);
                if let PollOutcome::Data(batch) = outcome {
                    shared.deliver_batch(batch);
                    shared.refresh_counts().await;
                }
                // Data and empty both re-poll immediately.
            }
            Err(e) => {
                log::warn!(
                    "long poll failed: {}; retrying in {}ms",
                    e,
                    retry_delay.as_millis()
                );
                shared.set_connection_state(ConnectionState::Error);
                if !live.load(Ordering::SeqCst) {
                    break;
                }
                // Flat wait; the stream transport's backoff does not apply.
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}
