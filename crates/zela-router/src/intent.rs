// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent kinds and classification results.

use serde::Serialize;
use zela_core::LastAction;

/// Handling pipeline an inbound message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Short slash or bare command (`/ajuda`, `hoje`, ...).
    Command,
    /// Help-seeking phrase.
    Help,
    /// Balance inquiry.
    Balance,
    /// Request to delete a transaction.
    DeletionRequest,
    /// Future-dated payment or receipt.
    Schedule,
    /// Income or expense to extract.
    Transaction,
    /// Free-form question for the financial chat.
    Question,
    /// No usable signal.
    Unknown,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IntentKind::Command => "command",
            IntentKind::Help => "help",
            IntentKind::Balance => "balance",
            IntentKind::DeletionRequest => "deletion_request",
            IntentKind::Schedule => "schedule",
            IntentKind::Transaction => "transaction",
            IntentKind::Question => "question",
            IntentKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Recognized short commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandToken {
    Ajuda,
    Help,
    Exemplos,
    Comandos,
    Hoje,
    Mes,
    /// A `/word` that is not a known command.
    Unrecognized(String),
}

impl CommandToken {
    pub(crate) fn parse(token: &str) -> Option<Self> {
        match token {
            "ajuda" => Some(CommandToken::Ajuda),
            "help" => Some(CommandToken::Help),
            "exemplos" => Some(CommandToken::Exemplos),
            "comandos" => Some(CommandToken::Comandos),
            "hoje" => Some(CommandToken::Hoje),
            "mes" => Some(CommandToken::Mes),
            _ => None,
        }
    }

    /// The bare token, without the slash.
    pub fn as_str(&self) -> &str {
        match self {
            CommandToken::Ajuda => "ajuda",
            CommandToken::Help => "help",
            CommandToken::Exemplos => "exemplos",
            CommandToken::Comandos => "comandos",
            CommandToken::Hoje => "hoje",
            CommandToken::Mes => "mes",
            CommandToken::Unrecognized(token) => token,
        }
    }
}

/// Kind-specific payload of a classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IntentDetails {
    #[default]
    None,
    Command { comando: CommandToken },
    /// Identifier typed after the deletion phrase, uppercased.
    Deletion { identifier: Option<String> },
    /// Reply to a pending extraction awaiting confirmation.
    PendingReply { accepted: bool },
}

/// Output of [`classify`](crate::classify).
#[derive(Debug, Clone, PartialEq)]
pub struct IntentResult {
    pub kind: IntentKind,
    /// Confidence in the classification (0.0-1.0).
    pub confidence: f32,
    pub details: IntentDetails,
    /// Short description of the rule that fired, for logs.
    pub reason: &'static str,
}

/// The parts of a conversation context the classifier may read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextSignals {
    pub has_pending_extraction: bool,
    pub last_action: Option<LastAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(IntentKind::DeletionRequest.to_string(), "deletion_request");
        assert_eq!(IntentKind::Question.to_string(), "question");
    }

    #[test]
    fn command_tokens_round_trip() {
        for token in ["ajuda", "help", "exemplos", "comandos", "hoje", "mes"] {
            assert_eq!(CommandToken::parse(token).unwrap().as_str(), token);
        }
        assert!(CommandToken::parse("saldo").is_none());
        assert_eq!(CommandToken::Unrecognized("xyz".into()).as_str(), "xyz");
    }
}
