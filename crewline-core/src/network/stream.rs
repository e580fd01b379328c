// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Push-Stream Transport
//!
//! Strategy A: a persistent streaming request delivering line-delimited JSON
//! frames. Reconnects with bounded exponential backoff and gives up
//! terminally once the attempt budget is spent; recovery from there requires
//! an explicit restart. Each attempt opens a fresh connection, never resumes
//! an old one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;

use super::backend::{ByteChunks, NotificationBackend};
use super::error::NetworkError;
use super::message::StreamFrame;
use super::reconnect::{ReconnectConfig, ReconnectPolicy};
use super::sync::SyncShared;
use super::transport::{ConnectionState, NotificationTransport};

/// Persistent push-stream transport.
pub struct StreamTransport<B> {
    shared: Arc<SyncShared<B>>,
    reconnect: ReconnectConfig,
    live: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<B: NotificationBackend> StreamTransport<B> {
    /// Creates a transport over the shared sync state.
    pub fn new(shared: Arc<SyncShared<B>>, reconnect: ReconnectConfig) -> Self {
        StreamTransport {
            shared,
            reconnect,
            live: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl<B: NotificationBackend> NotificationTransport for StreamTransport<B> {
    fn start(&mut self) {
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        self.live.store(true, Ordering::SeqCst);
        let shared = self.shared.clone();
        let live = self.live.clone();
        let config = self.reconnect.clone();
        self.handle = Some(tokio::spawn(run_stream(shared, live, config)));
    }

    fn stop(&mut self) {
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

impl<B> Drop for StreamTransport<B> {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Connect/read/backoff loop.
///
/// A single task owns the whole lifecycle, so at most one reconnect wait can
/// be pending; every newly scheduled wait structurally replaces the last.
async fn run_stream<B: NotificationBackend>(
    shared: Arc<SyncShared<B>>,
    live: Arc<AtomicBool>,
    config: ReconnectConfig,
) {
    let mut policy = ReconnectPolicy::new(config);
    loop {
        if !live.load(Ordering::SeqCst) {
            return;
        }
        shared.set_connection_state(ConnectionState::Connecting);

        match shared.backend().open_stream().await {
            Ok(chunks) => {
                if let Err(reason) = read_frames(&shared, &live, &mut policy, chunks).await {
                    log::warn!("push stream interrupted: {}", reason);
                } else {
                    // Stopped cooperatively.
                    return;
                }
            }
            Err(e) => log::warn!("push stream connect failed: {}", e),
        }

        if !live.load(Ordering::SeqCst) {
            return;
        }
        shared.set_connection_state(ConnectionState::Error);

        match policy.next_delay() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => {
                log::warn!("push stream reconnect attempts exhausted; waiting for manual restart");
                shared.report_error(&NetworkError::MaxRetriesExceeded.to_string());
                return;
            }
        }
    }
}

/// Reads one connection's frames until the stream breaks or we are stopped.
///
/// Returns `Ok(())` only on cooperative stop; a broken stream is an `Err`
/// with the reason, which sends the caller into the backoff path.
async fn read_frames<B: NotificationBackend>(
    shared: &SyncShared<B>,
    live: &AtomicBool,
    policy: &mut ReconnectPolicy,
    mut chunks: ByteChunks,
) -> Result<(), NetworkError> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut healthy = false;

    while let Some(chunk) = chunks.next().await {
        if !live.load(Ordering::SeqCst) {
            return Ok(());
        }
        let chunk = chunk?;
        buffer.extend_from_slice(&chunk);

        while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline).collect();
            let line = trim_line(&line);
            if line.is_empty() {
                continue;
            }

            match serde_json::from_slice::<StreamFrame>(line) {
                Ok(frame) => {
                    if !healthy {
                        // First good frame marks the connection established.
                        healthy = true;
                        shared.set_connection_state(ConnectionState::Connected);
                        policy.reset();
                    }
                    handle_frame(shared, frame).await;
                }
                // A bad frame never kills the transport.
                Err(e) => log::warn!("skipping malformed stream frame: {}", e),
            }
        }
    }

    Err(NetworkError::StreamClosed("closed by server".to_string()))
}

async fn handle_frame<B: NotificationBackend>(shared: &SyncShared<B>, frame: StreamFrame) {
    match frame {
        StreamFrame::Notification(frame) => {
            shared.deliver(frame.into());
            // Counters are refetched wholesale, never bumped incrementally.
            shared.refresh_counts().await;
        }
        StreamFrame::Ping {} => {}
        StreamFrame::Connection {} => log::debug!("push stream connection ack"),
    }
}

fn trim_line(line: &[u8]) -> &[u8] {
    let mut line = line;
    while let Some((&last, rest)) = line.split_last() {
        if last == b'\n' || last == b'\r' {
            line = rest;
        } else {
            break;
        }
    }
    line
}
