//! Backend Trait
//!
//! The server contract consumed by the transports and the facade.
//! `HttpBackend` implements it against the REST/stream endpoints;
//! `MockBackend` scripts it for tests.

use std::future::Future;
use std::pin::Pin;

use futures::Stream;

use super::error::{NetworkError, NetworkResult};
use crate::notifications::{CountsSnapshot, NewNotification, Notification, NotificationKind};

/// Chunked bytes from the push-stream endpoint.
///
/// Chunk boundaries are arbitrary; the stream transport reassembles
/// newline-delimited frames.
pub type ByteChunks = Pin<Box<dyn Stream<Item = Result<Vec<u8>, NetworkError>> + Send>>;

/// Outcome of one long-poll request.
#[derive(Debug)]
pub enum PollOutcome {
    /// New notifications were waiting.
    Data(Vec<Notification>),
    /// The server's hold expired with nothing new (HTTP 204).
    Empty,
}

/// Server contract for the notification subsystem.
///
/// All methods are one logical request each; retry policy lives in the
/// callers, not here.
pub trait NotificationBackend: Send + Sync + 'static {
    /// Fetches the full notification list.
    fn fetch_notifications(
        &self,
    ) -> impl Future<Output = NetworkResult<Vec<Notification>>> + Send;

    /// Fetches the full unread counter snapshot.
    fn fetch_counts(&self) -> impl Future<Output = NetworkResult<CountsSnapshot>> + Send;

    /// Marks one notification read server-side.
    fn mark_read(&self, id: &str) -> impl Future<Output = NetworkResult<()>> + Send;

    /// Marks every notification read server-side.
    fn mark_all_read(&self) -> impl Future<Output = NetworkResult<()>> + Send;

    /// Marks a group (optionally one kind) read server-side.
    fn mark_group_read(
        &self,
        group_id: &str,
        kind: Option<NotificationKind>,
    ) -> impl Future<Output = NetworkResult<()>> + Send;

    /// Creates a notification server-side and returns the stored record.
    fn create(
        &self,
        new: &NewNotification,
    ) -> impl Future<Output = NetworkResult<Notification>> + Send;

    /// Opens a fresh push-stream connection.
    fn open_stream(&self) -> impl Future<Output = NetworkResult<ByteChunks>> + Send;

    /// Issues one blocking long poll.
    fn poll(&self) -> impl Future<Output = NetworkResult<PollOutcome>> + Send;
}
