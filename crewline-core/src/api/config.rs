//! Client Configuration

use std::time::Duration;

use crate::network::{HttpConfig, ReconnectConfig};

/// Which delivery strategy feeds the store.
///
/// Chosen here, at configuration time; the facade never swaps strategies on
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// Persistent push stream with exponential reconnect backoff.
    #[default]
    Stream,
    /// Long-poll loop with a flat retry delay.
    LongPoll,
}

/// Configuration for the notification client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP settings (base URL, timeouts, proxy).
    pub http: HttpConfig,
    /// Id of the signed-in user. Gates local insertion of self-created
    /// notifications addressed to someone else.
    pub user_id: String,
    /// Delivery strategy.
    pub transport: TransportKind,
    /// Backoff settings for the push stream.
    pub reconnect: ReconnectConfig,
    /// Fixed wait after a failed long poll. Deliberately flat.
    pub poll_retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            http: HttpConfig::default(),
            user_id: String::new(),
            transport: TransportKind::default(),
            reconnect: ReconnectConfig::default(),
            poll_retry_delay: Duration::from_millis(5_000),
        }
    }
}

impl ClientConfig {
    /// Creates a config for a server and user.
    pub fn new(server_url: &str, user_id: &str) -> Self {
        ClientConfig {
            http: HttpConfig {
                server_url: server_url.to_string(),
                ..HttpConfig::default()
            },
            user_id: user_id.to_string(),
            ..ClientConfig::default()
        }
    }

    /// Selects the delivery strategy.
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Routes requests through a proxy (SOCKS5 URL for Tor-style setups).
    pub fn with_proxy(mut self, proxy_url: &str) -> Self {
        self.http.proxy_url = Some(proxy_url.to_string());
        self
    }

    /// Overrides the stream backoff settings.
    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Overrides the flat long-poll retry delay.
    pub fn with_poll_retry_delay(mut self, delay: Duration) -> Self {
        self.poll_retry_delay = delay;
        self
    }
}
