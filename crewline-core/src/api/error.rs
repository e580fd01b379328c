// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! API Error Types
//!
//! Unified error type for the client API layer.

use thiserror::Error;

use crate::network::NetworkError;

/// Unified error type for notification client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid operation in current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Result type for notification client operations.
pub type ClientResult<T> = Result<T, ClientError>;
