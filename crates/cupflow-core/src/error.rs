// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cupflow service.

use thiserror::Error;

/// The primary error type used across Cupflow's storage, console, and
/// gateway crates.
#[derive(Debug, Error)]
pub enum CupflowError {
    /// Configuration errors (invalid TOML, missing required fields, absent
    /// credentials at startup).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, migration
    /// failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat transport errors (Telegram API failure, send/edit rejection).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
