//! Event System
//!
//! Callbacks for notification engine events.

use std::sync::{Arc, PoisonError, RwLock};

use crate::network::ConnectionState;

/// Events emitted by the notification engine.
#[derive(Debug, Clone)]
pub enum NotifyEvent {
    /// A notification arrived over the active transport.
    NotificationReceived {
        /// The notification ID.
        id: String,
    },

    /// The store was reloaded from a full server fetch.
    NotificationsLoaded {
        /// Number of records loaded.
        count: usize,
    },

    /// One notification was marked read locally.
    MarkedRead {
        /// The notification ID.
        id: String,
    },

    /// Every notification was marked read locally.
    AllMarkedRead {
        /// How many records flipped.
        changed: usize,
    },

    /// A group's notifications were marked read locally.
    GroupMarkedRead {
        /// The group ID.
        group_id: String,
        /// How many records flipped.
        changed: usize,
    },

    /// The unread counter snapshot was replaced.
    CountsUpdated,

    /// Transport connection state changed.
    ConnectionStateChanged {
        /// The new connection state.
        state: ConnectionState,
    },

    /// Error surfaced by an async operation.
    Error {
        /// Error description.
        message: String,
    },
}

/// Event handler trait.
///
/// Implement this trait to receive notification engine events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: NotifyEvent);
}

/// Simple callback-based event handler.
///
/// Wraps a closure for easy event handling.
pub struct CallbackHandler<F>
where
    F: Fn(NotifyEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(NotifyEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(NotifyEvent) + Send + Sync,
{
    fn on_event(&self, event: NotifyEvent) {
        (self.callback)(event);
    }
}

/// Event dispatcher for managing multiple handlers.
///
/// Subscription goes through a shared reference so handlers can attach
/// after the dispatcher is already wired into the sync state.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new() -> Self {
        EventDispatcher {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Adds an event handler.
    pub fn add_handler(&self, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Removes all handlers.
    pub fn clear_handlers(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: NotifyEvent) {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        for handler in handlers.iter() {
            handler.on_event(event.clone());
        }
    }
}
