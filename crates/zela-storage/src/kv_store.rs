// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent [`ExpiringStore`] on the `kv_entries` table.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use zela_core::{ExpiringStore, ZelaError};

use crate::database::Database;
use crate::queries::kv;

/// Expiring store that survives restarts.
///
/// Deadlines are wall-clock milliseconds, so entries expire across process
/// restarts as well.
#[derive(Clone)]
pub struct SqliteExpiringStore {
    db: Database,
}

impl SqliteExpiringStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn deadline_ms(ttl: Duration) -> i64 {
    now_ms().saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX))
}

#[async_trait]
impl ExpiringStore for SqliteExpiringStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ZelaError> {
        kv::get(&self.db, key, now_ms()).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), ZelaError> {
        kv::set(&self.db, key, value, deadline_ms(ttl)).await
    }

    async fn delete(&self, key: &str) -> Result<(), ZelaError> {
        kv::delete(&self.db, key).await
    }

    async fn sweep(&self) -> Result<usize, ZelaError> {
        kv::sweep(&self.db, now_ms()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteExpiringStore {
        SqliteExpiringStore::new(Database::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn set_get_overwrite_delete() {
        let store = store().await;
        let ttl = Duration::from_secs(60);
        store.set("k", "a".into(), ttl).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("a"));

        store.set("k", "b".into(), ttl).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("b"));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn zero_ttl_is_immediately_expired_and_swept() {
        let store = store().await;
        store.set("gone", "x".into(), Duration::ZERO).await.unwrap();
        store.set("kept", "y".into(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get("gone").await.unwrap(), None);
        assert_eq!(store.sweep().await.unwrap(), 1);
        assert_eq!(store.get("kept").await.unwrap().as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn huge_ttl_does_not_overflow() {
        let store = store().await;
        store.set("k", "v".into(), Duration::MAX).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
