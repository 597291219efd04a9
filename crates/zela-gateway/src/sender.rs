// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback outbound sender.

use async_trait::async_trait;
use zela_core::types::{AdapterType, HealthStatus, OutboundMessage};
use zela_core::{MessageSender, PluginAdapter, ZelaError};

/// Writes outbound messages to the log instead of a WhatsApp provider.
///
/// Used when no provider client is wired in, e.g. local development.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSender;

#[async_trait]
impl PluginAdapter for LogSender {
    fn name(&self) -> &str {
        "log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        Ok(HealthStatus::Degraded("no WhatsApp provider configured".into()))
    }

    async fn shutdown(&self) -> Result<(), ZelaError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSender for LogSender {
    async fn send(&self, msg: OutboundMessage) -> Result<(), ZelaError> {
        tracing::info!(
            recipient = %msg.recipient,
            chars = msg.text.chars().count(),
            "outbound message (not delivered)"
        );
        tracing::debug!(text = %msg.text, "outbound message body");
        Ok(())
    }
}
