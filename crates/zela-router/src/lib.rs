// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing for inbound WhatsApp messages.
//!
//! [`classify`] maps a message (plus the little it needs from the
//! conversation context) to one handling pipeline. It is a pure keyword
//! table: no LLM call, no I/O, same input same output.

pub mod classifier;
pub mod intent;
mod text;

pub use classifier::classify;
pub use intent::{CommandToken, ContextSignals, IntentDetails, IntentKind, IntentResult};
