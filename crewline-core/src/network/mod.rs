//! Network + Transport Layer
//!
//! Delivers server-generated notification events into the local store over
//! one of two interchangeable strategies.
//!
//! # Architecture
//!
//! - **Backend trait**: the server contract (REST + stream + poll), with an
//!   HTTP implementation and a scripted mock
//! - **Wire types**: REST bodies and push-stream frames
//! - **Reconnect policy**: bounded exponential backoff for the stream
//! - **Transports**: push-stream (Strategy A) and long-poll (Strategy B)
//!   tasks feeding the shared sync state
//! - **Shared sync state**: the single mutation owner for store + counters
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crewline_core::network::{MockBackend, StreamTransport, SyncShared};
//! use crewline_core::network::{NotificationTransport, ReconnectConfig};
//!
//! let backend = MockBackend::new();
//! let shared = Arc::new(SyncShared::new(backend.clone()));
//! let mut transport = StreamTransport::new(shared.clone(), ReconnectConfig::default());
//!
//! transport.start();
//! backend.push_stream_line(r#"{"type":"ping"}"#);
//! // ... later
//! transport.stop();
//! ```

mod backend;
mod error;
mod http;
mod message;
mod mock;
mod poll;
mod reconnect;
mod stream;
mod sync;
mod transport;

// Error types
pub use error::{NetworkError, NetworkResult};

// Wire types
pub use message::{NotificationFrame, StreamFrame};

// Backend abstraction
pub use backend::{ByteChunks, NotificationBackend, PollOutcome};

// HTTP backend for production
pub use http::{HttpBackend, HttpConfig};

// Mock backend for testing
pub use mock::{MockBackend, MockPoll};

// Reconnection policy
pub use reconnect::{ReconnectConfig, ReconnectPolicy};

// Transport abstraction
pub use transport::{ConnectionState, NotificationTransport};

// Concrete transports
pub use poll::LongPollTransport;
pub use stream::StreamTransport;

// Shared sync state
pub use sync::SyncShared;
