// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the ledger backend (SQLite, etc.).

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    LedgerSummary, NewSchedule, NewTransaction, ScheduleRecord, ScheduleStatus,
    TransactionRecord,
};

/// Adapter for the persistent ledger.
///
/// Owner arguments are raw phone strings; implementations reconcile them
/// against stored owners through phone variant matching, never raw equality.
/// Mutations return [`ZelaError::NotFound`] for a missing row and
/// [`ZelaError::Forbidden`] for a row owned by someone else.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ZelaError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ZelaError>;

    // --- Transactions ---

    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64, ZelaError>;

    /// Inserts the whole batch or nothing. Ids are returned in input order.
    async fn insert_transactions(&self, txs: &[NewTransaction]) -> Result<Vec<i64>, ZelaError>;

    async fn get_transaction(&self, id: i64) -> Result<Option<TransactionRecord>, ZelaError>;

    /// Lists the owner's transactions, newest first.
    async fn list_transactions(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, ZelaError>;

    async fn delete_transaction(&self, id: i64, caller: &str) -> Result<(), ZelaError>;

    /// Sums the owner's transactions dated on or after `since` (`YYYY-MM-DD`).
    async fn summary(
        &self,
        owner: &str,
        since: Option<chrono::NaiveDate>,
    ) -> Result<LedgerSummary, ZelaError>;

    // --- Schedules ---

    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<i64, ZelaError>;

    async fn list_schedules(
        &self,
        owner: &str,
        status: Option<ScheduleStatus>,
    ) -> Result<Vec<ScheduleRecord>, ZelaError>;

    async fn delete_schedule(&self, id: i64, caller: &str) -> Result<(), ZelaError>;

    async fn update_schedule_status(
        &self,
        id: i64,
        caller: &str,
        status: ScheduleStatus,
    ) -> Result<(), ZelaError>;

    // --- Registered numbers ---

    async fn register_number(&self, phone: &str) -> Result<(), ZelaError>;

    async fn is_registered(&self, phone: &str) -> Result<bool, ZelaError>;
}
