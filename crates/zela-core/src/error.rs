// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Zela finance assistant.

use thiserror::Error;

/// The primary error type used across all Zela adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ZelaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging gateway errors (delivery failure, malformed payload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Assistant (LLM collaborator) errors.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested resource does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// The resource exists but belongs to a different subscriber.
    #[error("{resource} {id} is not owned by the caller")]
    Forbidden { resource: &'static str, id: String },

    /// The caller could not be authenticated.
    #[error("unauthorized")]
    Unauthorized,

    /// Input rejected before reaching storage.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ZelaError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ZelaError::Storage {
            source: Box::new(err),
        }
    }
}
