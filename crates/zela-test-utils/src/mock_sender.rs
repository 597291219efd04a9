// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message sender that records instead of delivering.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use zela_core::types::{AdapterType, HealthStatus, OutboundMessage};
use zela_core::{MessageSender, PluginAdapter, ZelaError};

/// Captures outbound messages for assertions.
#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `send` fail with a channel error.
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn last_text(&self) -> Option<String> {
        self.sent.lock().await.last().map(|m| m.text.clone())
    }
}

#[async_trait]
impl PluginAdapter for RecordingSender {
    fn name(&self) -> &str {
        "recording-sender"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ZelaError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, msg: OutboundMessage) -> Result<(), ZelaError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ZelaError::Channel {
                message: "send disabled by test".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(msg);
        Ok(())
    }
}
