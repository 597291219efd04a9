// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Zela finance assistant.
//!
//! This crate provides the adapter traits, the shared error type, and the
//! ledger types used throughout the workspace. Storage backends, messaging
//! gateways, and the LLM assistant all implement traits defined here.

pub mod error;
pub mod identifier;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ZelaError;
pub use identifier::{decode_identifier, encode_identifier};
pub use types::{AdapterType, HealthStatus, LastAction};

pub use traits::{AssistantAdapter, ExpiringStore, MessageSender, PluginAdapter, StorageAdapter};
