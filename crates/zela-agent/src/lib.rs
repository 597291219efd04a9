// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message dispatch for the Zela finance assistant.
//!
//! [`MessageDispatcher`] turns an inbound WhatsApp message into a reply:
//! identity reconciliation, conversation context, intent routing, the
//! ledger, and the LLM assistant all meet here. Delivery is left to the
//! caller so every gateway shares one pipeline.

pub mod dispatcher;
pub mod format;

pub use dispatcher::{DispatchOutcome, DispatcherConfig, MessageDispatcher};
