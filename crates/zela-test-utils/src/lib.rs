// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Zela integration tests.
//!
//! Mock collaborators and a wired-up harness so pipeline tests run without
//! an LLM or a WhatsApp provider.
//!
//! # Components
//!
//! - [`MockAssistant`] - scripted transaction/schedule extraction and answers
//! - [`RecordingSender`] - captures outbound messages
//! - [`FailingStore`] - expiring store that always errors
//! - [`TestHarness`] - dispatcher over in-memory SQLite

pub mod failing_store;
pub mod harness;
pub mod mock_assistant;
pub mod mock_sender;

pub use failing_store::FailingStore;
pub use harness::{TestHarness, TestHarnessBuilder, harness_today};
pub use mock_assistant::{AssistantCall, MockAssistant};
pub use mock_sender::RecordingSender;
