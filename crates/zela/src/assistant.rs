// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder assistant for deployments without an LLM provider.

use async_trait::async_trait;
use chrono::NaiveDate;

use zela_core::types::{
    AdapterType, ExtractedSchedule, HealthStatus, TransactionExtraction, TransactionRecord,
};
use zela_core::{AssistantAdapter, PluginAdapter, ZelaError};

/// Extracts nothing and answers nothing.
///
/// With this assistant the bot still serves commands, balance, deletion and
/// help; free text gets the "not understood" reply and questions get the
/// fallback answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredAssistant;

#[async_trait]
impl PluginAdapter for UnconfiguredAssistant {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Assistant
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        Ok(HealthStatus::Degraded("no assistant provider configured".into()))
    }

    async fn shutdown(&self) -> Result<(), ZelaError> {
        Ok(())
    }
}

#[async_trait]
impl AssistantAdapter for UnconfiguredAssistant {
    async fn extract_transactions(
        &self,
        _text: &str,
        _history: &str,
    ) -> Result<TransactionExtraction, ZelaError> {
        Ok(TransactionExtraction::default())
    }

    async fn extract_schedule(
        &self,
        _text: &str,
        _today: NaiveDate,
    ) -> Result<Option<ExtractedSchedule>, ZelaError> {
        Ok(None)
    }

    async fn answer(
        &self,
        _question: &str,
        _history: &str,
        _recent: &[TransactionRecord],
    ) -> Result<String, ZelaError> {
        Err(ZelaError::Provider {
            message: "no assistant provider configured".into(),
            source: None,
        })
    }
}
