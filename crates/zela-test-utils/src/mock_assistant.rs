// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted assistant for deterministic dispatcher tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use zela_core::types::{
    AdapterType, ExtractedSchedule, HealthStatus, TransactionExtraction, TransactionRecord,
};
use zela_core::{AssistantAdapter, PluginAdapter, ZelaError};

/// One recorded call into the assistant.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantCall {
    ExtractTransactions { text: String, history: String },
    ExtractSchedule { text: String, today: NaiveDate },
    Answer { question: String, history: String, recent: usize },
}

#[derive(Default)]
struct Script {
    extractions: VecDeque<Result<TransactionExtraction, String>>,
    schedules: VecDeque<Result<Option<ExtractedSchedule>, String>>,
    answers: VecDeque<Result<String, String>>,
    calls: Vec<AssistantCall>,
}

/// An assistant that replays queued results.
///
/// Each queue is FIFO. An empty queue yields an empty extraction, no
/// schedule, or the answer `"mock answer"`. Queued `Err` strings become
/// [`ZelaError::Provider`].
#[derive(Clone, Default)]
pub struct MockAssistant {
    script: Arc<Mutex<Script>>,
}

fn provider_error(message: String) -> ZelaError {
    ZelaError::Provider {
        message,
        source: None,
    }
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_extraction(&self, extraction: TransactionExtraction) {
        self.script.lock().await.extractions.push_back(Ok(extraction));
    }

    pub async fn push_extraction_error(&self, message: &str) {
        self.script
            .lock()
            .await
            .extractions
            .push_back(Err(message.to_string()));
    }

    pub async fn push_schedule(&self, schedule: Option<ExtractedSchedule>) {
        self.script.lock().await.schedules.push_back(Ok(schedule));
    }

    pub async fn push_answer(&self, answer: &str) {
        self.script.lock().await.answers.push_back(Ok(answer.to_string()));
    }

    pub async fn push_answer_error(&self, message: &str) {
        self.script
            .lock()
            .await
            .answers
            .push_back(Err(message.to_string()));
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<AssistantCall> {
        self.script.lock().await.calls.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockAssistant {
    fn name(&self) -> &str {
        "mock-assistant"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Assistant
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ZelaError> {
        Ok(())
    }
}

#[async_trait]
impl AssistantAdapter for MockAssistant {
    async fn extract_transactions(
        &self,
        text: &str,
        history: &str,
    ) -> Result<TransactionExtraction, ZelaError> {
        let mut script = self.script.lock().await;
        script.calls.push(AssistantCall::ExtractTransactions {
            text: text.to_string(),
            history: history.to_string(),
        });
        script
            .extractions
            .pop_front()
            .unwrap_or_else(|| Ok(TransactionExtraction::default()))
            .map_err(provider_error)
    }

    async fn extract_schedule(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<Option<ExtractedSchedule>, ZelaError> {
        let mut script = self.script.lock().await;
        script.calls.push(AssistantCall::ExtractSchedule {
            text: text.to_string(),
            today,
        });
        script
            .schedules
            .pop_front()
            .unwrap_or(Ok(None))
            .map_err(provider_error)
    }

    async fn answer(
        &self,
        question: &str,
        history: &str,
        recent: &[TransactionRecord],
    ) -> Result<String, ZelaError> {
        let mut script = self.script.lock().await;
        script.calls.push(AssistantCall::Answer {
            question: question.to_string(),
            history: history.to_string(),
            recent: recent.len(),
        });
        script
            .answers
            .pop_front()
            .unwrap_or_else(|| Ok("mock answer".to_string()))
            .map_err(provider_error)
    }
}
