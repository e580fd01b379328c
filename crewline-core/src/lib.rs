//! Crewline Core Library
//!
//! Real-time notification synchronization engine for the Crewline
//! collaboration client: a deduplicated local notification store, a
//! per-group unread counter index, and two interchangeable delivery
//! transports (push stream / long poll) behind one facade.

pub mod api;
pub mod network;
pub mod notifications;

pub use api::{
    CallbackHandler, ClientConfig, ClientError, ClientResult, EventDispatcher, EventHandler,
    NotificationClient, NotifyEvent, TransportKind,
};
pub use network::{
    ConnectionState, HttpBackend, HttpConfig, LongPollTransport, MockBackend, MockPoll,
    NetworkError, NetworkResult, NotificationBackend, NotificationTransport, PollOutcome,
    ReconnectConfig, ReconnectPolicy, StreamTransport, SyncShared,
};
pub use notifications::{
    CountsSnapshot, NewNotification, Notification, NotificationKind, NotificationStore,
    UnreadCounters,
};
