// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes one inbound WhatsApp message to its handler and builds the reply.
//!
//! Flow per message: canonicalize the sender, record the message in the
//! conversation context, classify, run the handler, then record the reply
//! and the context changes the handler asked for. Context trouble is logged
//! and the message is still answered; assistant trouble becomes an apology
//! reply, never an error to the webhook.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use tracing::{debug, error, info, warn};
use zela_config::ZelaConfig;
use zela_context::{ContextManager, ConversationContext, PendingExtraction, Role};
use zela_core::types::{
    ExtractedTransaction, InboundMessage, NewSchedule, NewTransaction, TransactionExtraction,
};
use zela_core::{AssistantAdapter, LastAction, StorageAdapter, ZelaError, decode_identifier};
use zela_identity::{PhoneIdentity, PhoneNormalizer};
use zela_router::{CommandToken, IntentDetails, IntentKind, IntentResult, classify};

use crate::format;

/// Rows listed when a deletion names no identifier.
const RECENT_FOR_DELETION: usize = 10;

/// Rows handed to the assistant as context for questions.
const RECENT_FOR_QUESTIONS: usize = 20;

/// Dispatcher tunables, usually taken from [`ZelaConfig`].
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Extractions scoring below this are held for confirmation.
    pub confirm_threshold: f32,
    /// Messages of history passed to the assistant.
    pub history_in_prompt: usize,
    pub panel_url: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            confirm_threshold: 0.7,
            history_in_prompt: 5,
            panel_url: "usezela.com/painel".to_string(),
        }
    }
}

impl DispatcherConfig {
    pub fn from_config(config: &ZelaConfig) -> Self {
        Self {
            confirm_threshold: config.extraction.confirm_threshold,
            history_in_prompt: config.context.history_in_prompt,
            panel_url: config.agent.panel_url.clone(),
        }
    }
}

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Group chat message; not for the bot.
    Ignored,
    /// Sender could not be read as a phone number; nobody to answer.
    Rejected,
    /// A reply should be delivered to `recipient`.
    Replied {
        recipient: PhoneIdentity,
        reply: String,
        intent: IntentKind,
    },
}

/// Context change a handler wants applied after replying.
#[derive(Debug)]
enum PendingChange {
    Keep,
    Set(PendingExtraction),
    Clear,
}

#[derive(Debug)]
struct Reply {
    text: String,
    intent: IntentKind,
    action: Option<LastAction>,
    pending: PendingChange,
}

impl Reply {
    fn new(intent: IntentKind, text: String) -> Self {
        Self {
            text,
            intent,
            action: None,
            pending: PendingChange::Keep,
        }
    }

    fn action(mut self, action: LastAction) -> Self {
        self.action = Some(action);
        self
    }

    fn pending(mut self, change: PendingChange) -> Self {
        self.pending = change;
        self
    }
}

/// Per-message orchestrator shared by every webhook handler.
pub struct MessageDispatcher {
    storage: Arc<dyn StorageAdapter>,
    assistant: Arc<dyn AssistantAdapter>,
    contexts: Arc<ContextManager>,
    normalizer: PhoneNormalizer,
    config: DispatcherConfig,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl MessageDispatcher {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        assistant: Arc<dyn AssistantAdapter>,
        contexts: Arc<ContextManager>,
        normalizer: PhoneNormalizer,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            storage,
            assistant,
            contexts,
            normalizer,
            config,
            clock: local_now,
        }
    }

    /// Replaces the wall clock used for transaction timestamps and summaries.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn normalizer(&self) -> &PhoneNormalizer {
        &self.normalizer
    }

    fn today(&self) -> NaiveDate {
        (self.clock)().date()
    }

    /// Handles one inbound message end to end, except delivery.
    pub async fn handle(&self, inbound: &InboundMessage) -> Result<DispatchOutcome, ZelaError> {
        if inbound.is_group {
            debug!(channel = %inbound.channel, "ignoring group message");
            return Ok(DispatchOutcome::Ignored);
        }

        let who = self.normalizer.canonicalize(&inbound.sender);
        if who.is_unknown() {
            warn!(channel = %inbound.channel, "rejecting message from malformed sender");
            return Ok(DispatchOutcome::Rejected);
        }

        let text = inbound.text.trim();
        let max = self.contexts.max_messages();
        let snapshot = self
            .contexts
            .update(&who, |ctx| {
                ctx.add_message(Role::User, text, max);
                let intent = classify(text, Some(&ctx.signals()));
                // Claimed under the subscriber lock: one yes/no consumes the batch.
                let claimed = match intent.details {
                    IntentDetails::PendingReply { .. } => ctx.take_pending(),
                    _ => None,
                };
                (ctx.clone(), intent, claimed)
            })
            .await;
        let (context, intent, claimed) = match snapshot {
            Ok((ctx, intent, claimed)) => (Some(ctx), intent, claimed),
            Err(e) => {
                warn!(phone = %who, error = %e, "conversation context unavailable, continuing without it");
                (None, classify(text, None), None)
            }
        };
        info!(
            phone = %who,
            channel = %inbound.channel,
            intent = %intent.kind,
            confidence = intent.confidence,
            reason = intent.reason,
            "message classified"
        );

        let restore = claimed.clone();
        let reply = match self
            .route(&who, text, &intent, context.as_ref(), claimed)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                error!(phone = %who, intent = %intent.kind, error = %e, "handler failed");
                let reply = Reply::new(intent.kind, format::temporary_failure());
                // An unsaved batch waits for the next confirmation.
                match restore {
                    Some(pending) => reply.pending(PendingChange::Set(pending)),
                    None => reply,
                }
            }
        };

        let Reply {
            text: reply_text,
            intent: kind,
            action,
            pending,
        } = reply;

        let recorded = self
            .contexts
            .update(&who, |ctx| {
                ctx.add_message(Role::Assistant, reply_text.as_str(), max);
                if action.is_some() {
                    ctx.last_action = action;
                }
                match pending {
                    PendingChange::Keep => {}
                    PendingChange::Set(p) => ctx.pending_extraction = Some(p),
                    PendingChange::Clear => ctx.pending_extraction = None,
                }
            })
            .await;
        if let Err(e) = recorded {
            warn!(phone = %who, error = %e, "failed to record reply in conversation context");
        }

        Ok(DispatchOutcome::Replied {
            recipient: who,
            reply: reply_text,
            intent: kind,
        })
    }

    async fn route(
        &self,
        who: &PhoneIdentity,
        text: &str,
        intent: &IntentResult,
        context: Option<&ConversationContext>,
        claimed: Option<PendingExtraction>,
    ) -> Result<Reply, ZelaError> {
        match (&intent.kind, &intent.details) {
            (IntentKind::Command, IntentDetails::Command { comando }) => {
                self.command(who, comando).await
            }
            (IntentKind::Help, _) => Ok(Reply::new(
                IntentKind::Help,
                format::help_menu(&self.config.panel_url),
            )),
            (IntentKind::Balance, _) => {
                let summary = self.storage.summary(who.digits(), None).await?;
                Ok(Reply::new(IntentKind::Balance, format::balance(&summary)))
            }
            (IntentKind::DeletionRequest, IntentDetails::Deletion { identifier }) => {
                self.deletion(who, identifier.as_deref()).await
            }
            (IntentKind::Schedule, _) => self.schedule(who, text, context).await,
            (IntentKind::Question, _) => self.question(who, text, context).await,
            (_, IntentDetails::PendingReply { accepted }) => match claimed {
                Some(pending) => self.pending_reply(who, pending, *accepted).await,
                None => self.transaction(who, text, context).await,
            },
            _ => self.transaction(who, text, context).await,
        }
    }

    async fn command(&self, who: &PhoneIdentity, comando: &CommandToken) -> Result<Reply, ZelaError> {
        let text = match comando {
            CommandToken::Ajuda | CommandToken::Help => format::help_menu(&self.config.panel_url),
            CommandToken::Exemplos => format::examples(),
            CommandToken::Comandos => format::commands(),
            CommandToken::Hoje => {
                let summary = self.storage.summary(who.digits(), Some(self.today())).await?;
                format::day_summary(&summary)
            }
            CommandToken::Mes => {
                let today = self.today();
                let first = today.with_day(1).unwrap_or(today);
                let summary = self.storage.summary(who.digits(), Some(first)).await?;
                format::month_summary(&summary, &self.config.panel_url)
            }
            CommandToken::Unrecognized(token) => format::unrecognized_command(token),
        };
        Ok(Reply::new(IntentKind::Command, text))
    }

    async fn deletion(&self, who: &PhoneIdentity, code: Option<&str>) -> Result<Reply, ZelaError> {
        let Some(code) = code else {
            let recent = self
                .storage
                .list_transactions(who.digits(), RECENT_FOR_DELETION)
                .await?;
            return Ok(Reply::new(
                IntentKind::DeletionRequest,
                format::recent_transactions(&recent),
            ));
        };

        let Some(id) = decode_identifier(code) else {
            return Ok(Reply::new(
                IntentKind::DeletionRequest,
                format::transaction_not_found(code),
            ));
        };

        let text = match self.storage.delete_transaction(id, who.digits()).await {
            Ok(()) => {
                info!(phone = %who, id, code, "transaction deleted by request");
                format::transaction_deleted(code)
            }
            // Foreign rows are reported as missing so identifiers leak nothing.
            Err(ZelaError::NotFound { .. } | ZelaError::Forbidden { .. }) => {
                format::transaction_not_found(code)
            }
            Err(e) => return Err(e),
        };
        Ok(Reply::new(IntentKind::DeletionRequest, text))
    }

    async fn schedule(
        &self,
        who: &PhoneIdentity,
        text: &str,
        context: Option<&ConversationContext>,
    ) -> Result<Reply, ZelaError> {
        let extracted = match self.assistant.extract_schedule(text, self.today()).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(phone = %who, error = %e, "schedule extraction failed");
                return Ok(Reply::new(IntentKind::Schedule, format::not_understood()));
            }
        };
        let Some(schedule) = extracted else {
            debug!(phone = %who, "no schedule found, trying transaction extraction");
            return self.transaction(who, text, context).await;
        };

        let id = self
            .storage
            .insert_schedule(&NewSchedule {
                owner: who.digits().to_string(),
                description: schedule.description.clone(),
                amount: schedule.amount,
                due_date: schedule.due_date,
                kind: schedule.kind,
                category: schedule.category.clone(),
            })
            .await?;
        info!(phone = %who, id, due = %schedule.due_date, "schedule created");
        Ok(Reply::new(
            IntentKind::Schedule,
            format::schedule_registered(id, &schedule),
        ))
    }

    async fn question(
        &self,
        who: &PhoneIdentity,
        text: &str,
        context: Option<&ConversationContext>,
    ) -> Result<Reply, ZelaError> {
        let history = self.history(context);
        let recent = self
            .storage
            .list_transactions(who.digits(), RECENT_FOR_QUESTIONS)
            .await?;
        let answer = match self.assistant.answer(text, &history, &recent).await {
            Ok(answer) if !answer.trim().is_empty() => answer,
            Ok(_) => format::question_fallback(),
            Err(e) => {
                warn!(phone = %who, error = %e, "assistant answer failed");
                format::question_fallback()
            }
        };
        Ok(Reply::new(IntentKind::Question, answer).action(LastAction::Question))
    }

    /// `pending` was already taken out of the context by the caller.
    async fn pending_reply(
        &self,
        who: &PhoneIdentity,
        pending: PendingExtraction,
        accepted: bool,
    ) -> Result<Reply, ZelaError> {
        if !accepted {
            info!(phone = %who, count = pending.transactions.len(), "pending extraction discarded");
            return Ok(Reply::new(IntentKind::Transaction, format::pending_discarded())
                .action(LastAction::Editing));
        }
        let stored = self
            .persist(who, pending.transactions, pending.original_message)
            .await?;
        Ok(Reply::new(
            IntentKind::Transaction,
            format::transactions_registered(&stored, self.today(), &self.config.panel_url),
        )
        .action(LastAction::ExtractingTransaction))
    }

    async fn transaction(
        &self,
        who: &PhoneIdentity,
        text: &str,
        context: Option<&ConversationContext>,
    ) -> Result<Reply, ZelaError> {
        let history = self.history(context);
        let extraction = match self.assistant.extract_transactions(text, &history).await {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!(phone = %who, error = %e, "transaction extraction failed");
                TransactionExtraction::default()
            }
        };

        let quality = extraction.quality;
        let transactions: Vec<ExtractedTransaction> = extraction
            .transactions
            .into_iter()
            .filter(|t| t.amount.is_finite() && t.amount > 0.0)
            .collect();

        if transactions.is_empty() {
            debug!(phone = %who, "nothing financial extracted");
            return Ok(Reply::new(IntentKind::Unknown, format::not_understood()));
        }

        if quality < self.config.confirm_threshold {
            info!(phone = %who, quality, count = transactions.len(), "holding extraction for confirmation");
            let prompt = format::confirmation_prompt(&transactions, self.today());
            return Ok(Reply::new(IntentKind::Transaction, prompt)
                .action(LastAction::Confirming)
                .pending(PendingChange::Set(PendingExtraction::new(
                    transactions,
                    Some(text.to_string()),
                ))));
        }

        let stored = self.persist(who, transactions, Some(text.to_string())).await?;
        Ok(Reply::new(
            IntentKind::Transaction,
            format::transactions_registered(&stored, self.today(), &self.config.panel_url),
        )
        .action(LastAction::ExtractingTransaction)
        .pending(PendingChange::Clear))
    }

    /// Saves the batch atomically; a failure leaves no rows behind.
    async fn persist(
        &self,
        who: &PhoneIdentity,
        transactions: Vec<ExtractedTransaction>,
        original_message: Option<String>,
    ) -> Result<Vec<(i64, ExtractedTransaction)>, ZelaError> {
        let occurred_at = (self.clock)();
        let rows: Vec<NewTransaction> = transactions
            .iter()
            .map(|tx| NewTransaction {
                owner: who.digits().to_string(),
                description: tx.description.clone(),
                amount: tx.amount,
                category: tx.category.clone(),
                kind: tx.kind,
                method: tx.method,
                occurred_at,
                original_message: original_message.clone(),
            })
            .collect();
        let ids = self.storage.insert_transactions(&rows).await?;
        info!(phone = %who, count = ids.len(), "transactions recorded");
        Ok(ids.into_iter().zip(transactions).collect())
    }

    fn history(&self, context: Option<&ConversationContext>) -> String {
        context
            .map(|c| c.format_history(self.config.history_in_prompt))
            .unwrap_or_default()
    }
}
