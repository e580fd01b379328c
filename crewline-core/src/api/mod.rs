// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client API Layer
//!
//! High-level API for the Crewline notification engine.
//!
//! # Overview
//!
//! The API layer provides the surface the client shell consumes:
//! - Bootstrap and teardown tied to the session lifecycle
//! - Optimistic mutations with server write-through
//! - Unread counts and notification snapshots
//! - Event handling
//!
//! # Example
//!
//! ```ignore
//! use crewline_core::api::{ClientConfig, NotificationClient};
//!
//! let mut client = NotificationClient::new(
//!     ClientConfig::new("https://app.crewline.dev", "user-7"),
//! )?;
//!
//! client.on_event(|event| println!("event: {:?}", event));
//! client.bootstrap().await?;
//!
//! for n in client.notifications() {
//!     println!("[{}] {}", if n.read { " " } else { "*" }, n.title);
//! }
//! ```
//!
//! # Module Structure
//!
//! - [`error`] - Error types for the API layer
//! - [`config`] - Configuration types
//! - [`events`] - Event system for callbacks
//! - [`client`] - Main client facade

mod client;
mod config;
mod error;
pub(crate) mod events;

pub use client::NotificationClient;
pub use config::{ClientConfig, TransportKind};
pub use error::{ClientError, ClientResult};
pub use events::{CallbackHandler, EventDispatcher, EventHandler, NotifyEvent};
