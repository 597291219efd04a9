// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduled payment and receipt queries.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use zela_core::ZelaError;
use zela_core::types::{NewSchedule, ScheduleRecord, ScheduleStatus};

use super::{placeholders, text_enum};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, owner, description, amount, due_date, kind, category, status, created_at";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleRecord> {
    Ok(ScheduleRecord {
        id: row.get(0)?,
        owner: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        due_date: row.get(4)?,
        kind: text_enum(row, 5)?,
        category: row.get(6)?,
        status: text_enum(row, 7)?,
        created_at: row.get(8)?,
    })
}

pub async fn insert(db: &Database, schedule: &NewSchedule) -> Result<i64, ZelaError> {
    let s = schedule.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO schedules (owner, description, amount, due_date, kind, category) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    s.owner,
                    s.description,
                    s.amount,
                    s.due_date.format("%Y-%m-%d").to_string(),
                    s.kind.to_string(),
                    s.category,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: i64) -> Result<Option<ScheduleRecord>, ZelaError> {
    db.connection()
        .call(move |conn| -> Result<Option<ScheduleRecord>, rusqlite::Error> {
            let sql = format!("SELECT {COLUMNS} FROM schedules WHERE id = ?1");
            match conn.query_row(&sql, params![id], from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Soonest due first.
pub async fn list(
    db: &Database,
    owners: Vec<String>,
    status: Option<ScheduleStatus>,
) -> Result<Vec<ScheduleRecord>, ZelaError> {
    if owners.is_empty() {
        return Ok(Vec::new());
    }
    db.connection()
        .call(move |conn| -> Result<Vec<ScheduleRecord>, rusqlite::Error> {
            let status_filter = if status.is_some() { " AND status = ?" } else { "" };
            let sql = format!(
                "SELECT {COLUMNS} FROM schedules WHERE owner IN ({}){status_filter} \
                 ORDER BY due_date ASC, id ASC",
                placeholders(owners.len())
            );
            let mut values: Vec<Value> = owners.into_iter().map(Value::Text).collect();
            if let Some(status) = status {
                values.push(Value::Text(status.to_string()));
            }
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes row `id` if its owner is still `owner`. Returns rows affected.
pub async fn delete(db: &Database, id: i64, owner: &str) -> Result<usize, ZelaError> {
    let owner = owner.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM schedules WHERE id = ?1 AND owner = ?2",
                params![id, owner],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Sets the status of row `id` if its owner is still `owner`. Returns rows affected.
pub async fn update_status(
    db: &Database,
    id: i64,
    owner: &str,
    status: ScheduleStatus,
) -> Result<usize, ZelaError> {
    let owner = owner.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE schedules SET status = ?1 WHERE id = ?2 AND owner = ?3",
                params![status.to_string(), id, owner],
            )
        })
        .await
        .map_err(map_tr_err)
}
