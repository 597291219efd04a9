// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use zela_config::model::StorageConfig;
use zela_core::types::{
    LedgerSummary, NewSchedule, NewTransaction, ScheduleRecord, ScheduleStatus, TransactionRecord,
};
use zela_core::{AdapterType, HealthStatus, PluginAdapter, StorageAdapter, ZelaError};
use zela_identity::{PhoneIdentity, PhoneNormalizer, authorize_owner};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ledger.
///
/// Owners are written in canonical form and read back through the caller's
/// full variant set, so rows written under `556181474690` are visible to
/// `whatsapp:+5561981474690`. Mutations load the row, check ownership with
/// [`authorize_owner`], then act only if the owner is unchanged.
pub struct SqliteStorage {
    config: StorageConfig,
    normalizer: PhoneNormalizer,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The database is not opened until [`StorageAdapter::initialize`].
    pub fn new(config: StorageConfig, normalizer: PhoneNormalizer) -> Self {
        Self {
            config,
            normalizer,
            db: OnceCell::new(),
        }
    }

    /// Wraps an already-open database; `initialize` is then an error.
    pub fn with_database(db: Database, normalizer: PhoneNormalizer) -> Self {
        Self {
            config: StorageConfig::default(),
            normalizer,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// The underlying database, for sharing with [`SqliteExpiringStore`](crate::SqliteExpiringStore).
    pub fn database(&self) -> Result<&Database, ZelaError> {
        self.db.get().ok_or_else(|| ZelaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    fn caller(&self, raw: &str) -> PhoneIdentity {
        self.normalizer.canonicalize(raw)
    }

    /// Every stored spelling that belongs to `raw`; empty for malformed input.
    fn owner_forms(&self, raw: &str) -> Vec<String> {
        let who = self.caller(raw);
        if who.is_unknown() {
            return Vec::new();
        }
        who.variants().iter().map(str::to_string).collect()
    }

    fn canonical_owner(&self, raw: &str) -> Result<String, ZelaError> {
        let who = self.caller(raw);
        if who.is_unknown() {
            return Err(ZelaError::Validation("owner is not a valid phone number".into()));
        }
        Ok(who.digits().to_string())
    }
}

fn check_amount(amount: f64) -> Result<(), ZelaError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ZelaError::Validation(format!("invalid amount {amount}")))
    }
}

fn not_found(resource: &'static str, id: i64) -> ZelaError {
    ZelaError::NotFound {
        resource,
        id: id.to_string(),
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ZelaError> {
        self.database()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ZelaError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ZelaError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ZelaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ZelaError> {
        self.database()?.checkpoint().await
    }

    // --- Transactions ---

    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64, ZelaError> {
        check_amount(tx.amount)?;
        let mut tx = tx.clone();
        tx.owner = self.canonical_owner(&tx.owner)?;
        let id = queries::transactions::insert(self.database()?, &tx).await?;
        debug!(id, owner = %tx.owner, "transaction recorded");
        Ok(id)
    }

    async fn insert_transactions(&self, txs: &[NewTransaction]) -> Result<Vec<i64>, ZelaError> {
        let mut batch = Vec::with_capacity(txs.len());
        for tx in txs {
            check_amount(tx.amount)?;
            let mut tx = tx.clone();
            tx.owner = self.canonical_owner(&tx.owner)?;
            batch.push(tx);
        }
        let ids = queries::transactions::insert_many(self.database()?, batch).await?;
        debug!(count = ids.len(), "transaction batch recorded");
        Ok(ids)
    }

    async fn get_transaction(&self, id: i64) -> Result<Option<TransactionRecord>, ZelaError> {
        queries::transactions::get(self.database()?, id).await
    }

    async fn list_transactions(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, ZelaError> {
        queries::transactions::list(self.database()?, self.owner_forms(owner), limit).await
    }

    async fn delete_transaction(&self, id: i64, caller: &str) -> Result<(), ZelaError> {
        let db = self.database()?;
        let row = queries::transactions::get(db, id)
            .await?
            .ok_or_else(|| not_found("transaction", id))?;
        authorize_owner("transaction", id, &row.owner, &self.caller(caller))?;
        if queries::transactions::delete(db, id, &row.owner).await? == 0 {
            return Err(not_found("transaction", id));
        }
        info!(id, "transaction deleted");
        Ok(())
    }

    async fn summary(
        &self,
        owner: &str,
        since: Option<chrono::NaiveDate>,
    ) -> Result<LedgerSummary, ZelaError> {
        let since = since.map(|d| d.format("%Y-%m-%d").to_string());
        queries::transactions::summary(self.database()?, self.owner_forms(owner), since).await
    }

    // --- Schedules ---

    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<i64, ZelaError> {
        check_amount(schedule.amount)?;
        let mut schedule = schedule.clone();
        schedule.owner = self.canonical_owner(&schedule.owner)?;
        let id = queries::schedules::insert(self.database()?, &schedule).await?;
        debug!(id, due = %schedule.due_date, "schedule recorded");
        Ok(id)
    }

    async fn list_schedules(
        &self,
        owner: &str,
        status: Option<ScheduleStatus>,
    ) -> Result<Vec<ScheduleRecord>, ZelaError> {
        queries::schedules::list(self.database()?, self.owner_forms(owner), status).await
    }

    async fn delete_schedule(&self, id: i64, caller: &str) -> Result<(), ZelaError> {
        let db = self.database()?;
        let row = queries::schedules::get(db, id)
            .await?
            .ok_or_else(|| not_found("schedule", id))?;
        authorize_owner("schedule", id, &row.owner, &self.caller(caller))?;
        if queries::schedules::delete(db, id, &row.owner).await? == 0 {
            return Err(not_found("schedule", id));
        }
        info!(id, "schedule deleted");
        Ok(())
    }

    async fn update_schedule_status(
        &self,
        id: i64,
        caller: &str,
        status: ScheduleStatus,
    ) -> Result<(), ZelaError> {
        let db = self.database()?;
        let row = queries::schedules::get(db, id)
            .await?
            .ok_or_else(|| not_found("schedule", id))?;
        authorize_owner("schedule", id, &row.owner, &self.caller(caller))?;
        if queries::schedules::update_status(db, id, &row.owner, status).await? == 0 {
            return Err(not_found("schedule", id));
        }
        info!(id, %status, "schedule status updated");
        Ok(())
    }

    // --- Registered numbers ---

    async fn register_number(&self, phone: &str) -> Result<(), ZelaError> {
        let phone = self.canonical_owner(phone)?;
        queries::numbers::register(self.database()?, &phone).await
    }

    async fn is_registered(&self, phone: &str) -> Result<bool, ZelaError> {
        queries::numbers::any_registered(self.database()?, self.owner_forms(phone)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let storage = SqliteStorage::new(make_config("unused.db"), PhoneNormalizer::default());
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_then_health_check() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(
            make_config(db_path.to_str().unwrap()),
            PhoneNormalizer::default(),
        );

        assert!(storage.health_check().await.is_err(), "not initialized yet");
        storage.initialize().await.unwrap();
        assert!(db_path.exists());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        assert!(storage.initialize().await.is_err(), "second initialize fails");

        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let storage = SqliteStorage::with_database(
            Database::open_in_memory().await.unwrap(),
            PhoneNormalizer::default(),
        );
        let tx = NewTransaction {
            owner: "5561981474690".into(),
            description: "x".into(),
            amount: -1.0,
            category: "Outros".into(),
            kind: zela_core::types::TransactionKind::Saida,
            method: None,
            occurred_at: chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            original_message: None,
        };
        assert!(matches!(
            storage.insert_transaction(&tx).await,
            Err(ZelaError::Validation(_))
        ));
    }
}
