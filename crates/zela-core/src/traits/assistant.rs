// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assistant trait for the LLM-backed extractors and financial chat.

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ExtractedSchedule, TransactionExtraction, TransactionRecord};

/// LLM collaborator consulted after intent classification.
///
/// Prompt text and provider selection live entirely in the implementation;
/// the dispatcher only sees structured results.
#[async_trait]
pub trait AssistantAdapter: PluginAdapter {
    /// Extracts zero or more transactions from free text.
    ///
    /// `history` is the recent conversation, already formatted as prompt lines.
    async fn extract_transactions(
        &self,
        text: &str,
        history: &str,
    ) -> Result<TransactionExtraction, ZelaError>;

    /// Extracts a future-dated obligation, or `None` if the text does not describe one.
    async fn extract_schedule(
        &self,
        text: &str,
        today: chrono::NaiveDate,
    ) -> Result<Option<ExtractedSchedule>, ZelaError>;

    /// Answers a free-form question about the subscriber's finances.
    async fn answer(
        &self,
        question: &str,
        history: &str,
        recent: &[TransactionRecord],
    ) -> Result<String, ZelaError>;
}
