// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registered number queries.

use rusqlite::{params, params_from_iter};
use zela_core::ZelaError;

use super::placeholders;
use crate::database::{Database, map_tr_err};

/// Registers `phone`; registering twice is a no-op.
pub async fn register(db: &Database, phone: &str) -> Result<(), ZelaError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO registered_numbers (phone) VALUES (?1)",
                params![phone],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Whether any of `forms` is registered.
pub async fn any_registered(db: &Database, forms: Vec<String>) -> Result<bool, ZelaError> {
    if forms.is_empty() {
        return Ok(false);
    }
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM registered_numbers WHERE phone IN ({}))",
                placeholders(forms.len())
            );
            conn.query_row(&sql, params_from_iter(forms), |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
}
