// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dispatcher tests.
//!
//! `TestHarness` assembles the full message pipeline over an in-memory SQLite
//! ledger, an in-process context store, and a [`MockAssistant`], with the
//! clock pinned to 2026-03-07 10:30.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use zela_agent::{DispatchOutcome, DispatcherConfig, MessageDispatcher};
use zela_context::{ContextManager, MemoryStore};
use zela_core::types::InboundMessage;
use zela_core::{ExpiringStore, StorageAdapter, ZelaError};
use zela_identity::PhoneNormalizer;
use zela_storage::{Database, SqliteStorage};

use crate::failing_store::FailingStore;
use crate::mock_assistant::MockAssistant;

/// Date the harness clock reports.
pub fn harness_today() -> NaiveDate {
    harness_now().date()
}

fn harness_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 7)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .unwrap_or_default()
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    config: DispatcherConfig,
    failing_context: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            failing_context: false,
        }
    }

    pub fn with_confirm_threshold(mut self, threshold: f32) -> Self {
        self.config.confirm_threshold = threshold;
        self
    }

    /// Backs conversation contexts with a store that always errors.
    pub fn with_failing_context(mut self) -> Self {
        self.failing_context = true;
        self
    }

    pub async fn build(self) -> Result<TestHarness, ZelaError> {
        let db = Database::open_in_memory().await?;
        let storage = Arc::new(SqliteStorage::with_database(
            db.clone(),
            PhoneNormalizer::default(),
        ));
        let store: Arc<dyn ExpiringStore> = if self.failing_context {
            Arc::new(FailingStore)
        } else {
            Arc::new(MemoryStore::new())
        };
        let contexts = Arc::new(ContextManager::new(store, Duration::from_secs(600), 10));
        let assistant = MockAssistant::new();

        let dispatcher = MessageDispatcher::new(
            storage.clone(),
            Arc::new(assistant.clone()),
            contexts.clone(),
            PhoneNormalizer::default(),
            self.config,
        )
        .with_clock(harness_now);

        Ok(TestHarness {
            dispatcher: Arc::new(dispatcher),
            storage,
            contexts,
            assistant,
            db,
        })
    }
}

/// A fully wired dispatcher plus handles to its collaborators.
pub struct TestHarness {
    pub dispatcher: Arc<MessageDispatcher>,
    pub storage: Arc<SqliteStorage>,
    pub contexts: Arc<ContextManager>,
    pub assistant: MockAssistant,
    pub db: Database,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn new() -> Result<Self, ZelaError> {
        Self::builder().build().await
    }

    /// Dispatches a direct message from `sender` through the Z-API path.
    pub async fn send(&self, sender: &str, text: &str) -> Result<DispatchOutcome, ZelaError> {
        self.dispatcher
            .handle(&InboundMessage {
                sender: sender.to_string(),
                text: text.to_string(),
                is_group: false,
                channel: "zapi".to_string(),
            })
            .await
    }

    /// Reply text of a dispatched message; panics if nothing was replied.
    pub async fn reply(&self, sender: &str, text: &str) -> String {
        match self.send(sender, text).await {
            Ok(DispatchOutcome::Replied { reply, .. }) => reply,
            other => panic!("expected a reply to {text:?}, got {other:?}"),
        }
    }

    /// Runs raw SQL against the ledger, e.g. to install a failing trigger.
    pub async fn execute_sql(&self, sql: &str) -> Result<(), ZelaError> {
        let sql = sql.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> { conn.execute_batch(&sql) })
            .await
            .map_err(ZelaError::storage)
    }

    pub fn storage_adapter(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }
}
