// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP Backend
//!
//! Real backend implementation over the notification REST endpoint, the
//! push-stream endpoint and the long-poll endpoint.

use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, StatusCode};

use super::backend::{ByteChunks, NotificationBackend, PollOutcome};
use super::error::NetworkError;
use super::message::{
    CountsResponse, CreateBody, CreateResponse, ListResponse, MarkAllBody, MarkGroupBody,
    MarkOneBody,
};
use crate::notifications::{CountsSnapshot, NewNotification, Notification, NotificationKind};

/// Settings for the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Server base URL, e.g. "https://app.crewline.dev".
    pub server_url: String,
    /// Timeout for plain REST calls. Never applied to the push stream or the
    /// long-poll hold; their wait durations are server-controlled.
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout for every request.
    pub connect_timeout: Duration,
    /// Optional proxy URL (SOCKS5 for Tor-style deployments).
    pub proxy_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            server_url: String::new(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            proxy_url: None,
        }
    }
}

/// Backend over the notification HTTP contract.
///
/// One shared `reqwest::Client`; endpoints are derived from the configured
/// base URL.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpBackend {
    /// Builds the shared client from configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, NetworkError> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(format!(
                "Crewline/{}",
                option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
            ));

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(HttpBackend {
            client: builder.build()?,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/notifications", self.base_url)
    }

    fn stream_endpoint(&self) -> String {
        format!("{}/api/notifications/stream", self.base_url)
    }

    fn poll_endpoint(&self) -> String {
        format!("{}/api/notifications/poll", self.base_url)
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
        if !response.status().is_success() {
            return Err(NetworkError::Http(response.status().as_u16()));
        }
        Ok(response)
    }
}

impl NotificationBackend for HttpBackend {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, NetworkError> {
        let response = self
            .client
            .get(self.endpoint())
            .timeout(self.request_timeout)
            .send()
            .await?;
        let body: ListResponse = Self::check_status(response)?.json().await?;
        Ok(body.notifications)
    }

    async fn fetch_counts(&self) -> Result<CountsSnapshot, NetworkError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("counts", "true")])
            .timeout(self.request_timeout)
            .send()
            .await?;
        let body: CountsResponse = Self::check_status(response)?.json().await?;
        Ok(body.counts)
    }

    async fn mark_read(&self, id: &str) -> Result<(), NetworkError> {
        let response = self
            .client
            .put(self.endpoint())
            .json(&MarkOneBody { notification_id: id })
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), NetworkError> {
        let response = self
            .client
            .put(self.endpoint())
            .json(&MarkAllBody::new())
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn mark_group_read(
        &self,
        group_id: &str,
        kind: Option<NotificationKind>,
    ) -> Result<(), NetworkError> {
        let response = self
            .client
            .put(self.endpoint())
            .json(&MarkGroupBody::new(group_id, kind))
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn create(&self, new: &NewNotification) -> Result<Notification, NetworkError> {
        let body = CreateBody {
            kind: new.kind,
            title: &new.title,
            message: &new.message,
            group_id: new.group_id.as_deref(),
            target_user_id: new.target_user_id.as_deref(),
        };
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let body: CreateResponse = Self::check_status(response)?.json().await?;
        Ok(body.notification)
    }

    async fn open_stream(&self) -> Result<ByteChunks, NetworkError> {
        // No request timeout: the connection is expected to stay open.
        let response = self.client.get(self.stream_endpoint()).send().await?;
        let response = Self::check_status(response)?;
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(NetworkError::from));
        Ok(Box::pin(chunks))
    }

    async fn poll(&self) -> Result<PollOutcome, NetworkError> {
        // No request timeout: the server holds the request until new data
        // arrives or its own hold duration elapses.
        let response = self.client.get(self.poll_endpoint()).send().await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(PollOutcome::Empty),
            status if status.is_success() => {
                let notifications: Vec<Notification> = response.json().await?;
                Ok(PollOutcome::Data(notifications))
            }
            status => Err(NetworkError::Http(status.as_u16())),
        }
    }
}
