// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived per-subscriber state for the Zela finance assistant.
//!
//! Everything here sits on top of an [`ExpiringStore`](zela_core::ExpiringStore):
//! - [`ContextManager`]: recent messages, pending extraction, last action
//! - [`VerificationCodes`]: six-digit WhatsApp login codes
//! - [`SessionTokens`]: bearer tokens for the web panel
//!
//! [`MemoryStore`] is the in-process backend; the SQLite one lives in
//! `zela-storage`.

pub mod conversation;
pub mod manager;
pub mod memory;
pub mod session;
pub mod verification;

pub use conversation::{
    ContextMessage, ConversationContext, DEFAULT_MAX_MESSAGES, PendingExtraction, Role,
};
pub use manager::ContextManager;
pub use memory::MemoryStore;
pub use session::SessionTokens;
pub use verification::{DEFAULT_CODE_TTL, VerificationCodes};
