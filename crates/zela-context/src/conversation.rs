// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-subscriber conversation state.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zela_core::LastAction;
use zela_core::types::ExtractedTransaction;
use zela_router::ContextSignals;

/// Default number of messages retained per conversation.
pub const DEFAULT_MAX_MESSAGES: usize = 10;

/// Who sent a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used in prompt history.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "Usuário",
            Role::Assistant => "Assistente",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Transactions extracted with low confidence, waiting for a yes/no.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingExtraction {
    pub transactions: Vec<ExtractedTransaction>,
    /// The message the transactions were extracted from.
    #[serde(default)]
    pub original_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PendingExtraction {
    pub fn new(transactions: Vec<ExtractedTransaction>, original_message: Option<String>) -> Self {
        Self {
            transactions,
            original_message,
            created_at: Utc::now(),
        }
    }
}

/// Short-lived memory of one subscriber's exchange with the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Canonical phone key.
    pub subscriber_key: String,
    #[serde(default)]
    pub messages: VecDeque<ContextMessage>,
    #[serde(default)]
    pub pending_extraction: Option<PendingExtraction>,
    #[serde(default)]
    pub last_action: Option<LastAction>,
    pub last_updated: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(subscriber_key: impl Into<String>) -> Self {
        Self {
            subscriber_key: subscriber_key.into(),
            messages: VecDeque::new(),
            pending_extraction: None,
            last_action: None,
            last_updated: Utc::now(),
        }
    }

    /// Appends a message, evicting the oldest ones beyond `max_messages`.
    pub fn add_message(&mut self, role: Role, text: impl Into<String>, max_messages: usize) {
        self.messages.push_back(ContextMessage {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });
        while self.messages.len() > max_messages {
            self.messages.pop_front();
        }
    }

    /// What the intent classifier needs to know about this conversation.
    pub fn signals(&self) -> ContextSignals {
        ContextSignals {
            has_pending_extraction: self.pending_extraction.is_some(),
            last_action: self.last_action,
        }
    }

    /// The last `n` messages as prompt history, oldest first.
    pub fn format_history(&self, n: usize) -> String {
        let skip = self.messages.len().saturating_sub(n);
        self.messages
            .iter()
            .skip(skip)
            .map(|m| format!("{}: {}", m.role.label(), m.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Takes the pending extraction out, leaving none behind.
    pub fn take_pending(&mut self) -> Option<PendingExtraction> {
        self.pending_extraction.take()
    }
}
