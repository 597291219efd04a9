// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expiring key-value entries. Deadlines are Unix milliseconds.

use rusqlite::params;
use zela_core::ZelaError;

use crate::database::{Database, map_tr_err};

/// Live value for `key` at `now_ms`.
pub async fn get(db: &Database, key: &str, now_ms: i64) -> Result<Option<String>, ZelaError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            match conn.query_row(
                "SELECT value FROM kv_entries WHERE key = ?1 AND expires_at_ms > ?2",
                params![key, now_ms],
                |row| row.get(0),
            ) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set(db: &Database, key: &str, value: String, expires_at_ms: i64) -> Result<(), ZelaError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO kv_entries (key, value, expires_at_ms) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
                 expires_at_ms = excluded.expires_at_ms",
                params![key, value, expires_at_ms],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete(db: &Database, key: &str) -> Result<(), ZelaError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Removes entries expired at `now_ms`. Returns how many.
pub async fn sweep(db: &Database, now_ms: i64) -> Result<usize, ZelaError> {
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM kv_entries WHERE expires_at_ms <= ?1",
                params![now_ms],
            )
        })
        .await
        .map_err(map_tr_err)
}
