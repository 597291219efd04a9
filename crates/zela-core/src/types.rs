// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters, the dispatcher, and the ledger.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Assistant,
    Storage,
}

// --- Messaging ---

/// A message received from a messaging gateway webhook.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Raw sender phone as supplied by the provider (bare, `+`-prefixed or `whatsapp:+`).
    pub sender: String,
    /// Message text, already transcribed if the original was audio.
    pub text: String,
    /// Whether the message was posted in a group chat.
    pub is_group: bool,
    /// Provider the message arrived through (`zapi`, `twilio`, ...).
    pub channel: String,
}

/// A reply to deliver through the messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Canonical phone key of the recipient.
    pub recipient: String,
    pub text: String,
}

/// Tag describing what the bot last did in a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LastAction {
    ExtractingTransaction,
    Confirming,
    Editing,
    Question,
}

// --- Ledger ---

/// Direction of money flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionKind {
    /// Income.
    Entrada,
    /// Expense.
    Saida,
}

/// Card method, when the user mentions one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    Credito,
    Debito,
}

/// A transaction parsed out of free text, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTransaction {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
}

/// Output of the assistant's transaction extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionExtraction {
    pub transactions: Vec<ExtractedTransaction>,
    /// Extractor self-assessed quality in `[0.0, 1.0]`.
    pub quality: f32,
}

impl TransactionExtraction {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Whether a scheduled obligation is money going out or coming in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleKind {
    Pagamento,
    Recebimento,
}

/// Lifecycle of a scheduled obligation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScheduleStatus {
    Pendente,
    Pago,
    Cancelado,
}

/// A schedule parsed out of free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSchedule {
    pub description: String,
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    pub kind: ScheduleKind,
    #[serde(default)]
    pub category: Option<String>,
}

/// Insert payload for a transaction row.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Canonical phone key of the owner.
    pub owner: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub method: Option<PaymentMethod>,
    pub occurred_at: chrono::NaiveDateTime,
    pub original_message: Option<String>,
}

/// A persisted transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub owner: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub method: Option<PaymentMethod>,
    /// `YYYY-MM-DDTHH:MM:SS`.
    pub occurred_at: String,
    /// `YYYY-MM-DD`.
    pub occurred_on: String,
    pub original_message: Option<String>,
}

/// Insert payload for a schedule row.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub owner: String,
    pub description: String,
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    pub kind: ScheduleKind,
    pub category: Option<String>,
}

/// A persisted schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRecord {
    pub id: i64,
    pub owner: String,
    pub description: String,
    pub amount: f64,
    /// `YYYY-MM-DD`.
    pub due_date: String,
    pub kind: ScheduleKind,
    pub category: Option<String>,
    pub status: ScheduleStatus,
    pub created_at: String,
}

/// Aggregate of a subscriber's transactions over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn transaction_kind_uses_lowercase_wire_names() {
        assert_eq!(TransactionKind::Entrada.to_string(), "entrada");
        assert_eq!(TransactionKind::from_str("saida").unwrap(), TransactionKind::Saida);
        let json = serde_json::to_string(&TransactionKind::Saida).unwrap();
        assert_eq!(json, "\"saida\"");
    }

    #[test]
    fn last_action_round_trips_through_json() {
        let json = serde_json::to_string(&LastAction::ExtractingTransaction).unwrap();
        assert_eq!(json, "\"extracting_transaction\"");
        let back: LastAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LastAction::ExtractingTransaction);
    }

    #[test]
    fn extracted_transaction_method_defaults_to_none() {
        let t: ExtractedTransaction = serde_json::from_str(
            r#"{"description":"mercado","amount":52.3,"category":"alimentacao","kind":"saida"}"#,
        )
        .unwrap();
        assert_eq!(t.method, None);
        assert_eq!(t.kind, TransactionKind::Saida);
    }

    #[test]
    fn schedule_status_parses_portuguese_names() {
        assert_eq!(ScheduleStatus::from_str("pago").unwrap(), ScheduleStatus::Pago);
        assert!(ScheduleStatus::from_str("done").is_err());
    }

    #[test]
    fn empty_extraction() {
        assert!(TransactionExtraction::default().is_empty());
    }
}
