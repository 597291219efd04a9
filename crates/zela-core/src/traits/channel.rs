// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging gateway trait (Z-API, Twilio, ...).

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundMessage;

/// Delivers replies and verification codes to a subscriber's WhatsApp.
#[async_trait]
pub trait MessageSender: PluginAdapter {
    /// Sends a text message. Retry policy belongs to the implementation.
    async fn send(&self, msg: OutboundMessage) -> Result<(), ZelaError>;
}
