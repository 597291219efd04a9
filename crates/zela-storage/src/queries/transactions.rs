// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger transaction queries.
//!
//! Functions taking `owners` expect the caller's full phone variant set;
//! ownership is decided by the adapter, not here.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use zela_core::ZelaError;
use zela_core::types::{LedgerSummary, NewTransaction, TransactionRecord};

use super::{opt_text_enum, placeholders, text_enum};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, owner, description, amount, category, kind, method, \
                       occurred_at, occurred_on, original_message";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        owner: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        kind: text_enum(row, 5)?,
        method: opt_text_enum(row, 6)?,
        occurred_at: row.get(7)?,
        occurred_on: row.get(8)?,
        original_message: row.get(9)?,
    })
}

fn insert_row(conn: &rusqlite::Connection, tx: &NewTransaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (owner, description, amount, category, kind, method, \
         occurred_at, occurred_on, original_message) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            tx.owner,
            tx.description,
            tx.amount,
            tx.category,
            tx.kind.to_string(),
            tx.method.map(|m| m.to_string()),
            tx.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx.occurred_at.date().format("%Y-%m-%d").to_string(),
            tx.original_message,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a transaction whose owner is already canonical. Returns the row id.
pub async fn insert(db: &Database, tx: &NewTransaction) -> Result<i64, ZelaError> {
    let tx = tx.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> { insert_row(conn, &tx) })
        .await
        .map_err(map_tr_err)
}

/// Inserts a batch inside one SQLite transaction: all rows commit or none do.
/// Ids come back in input order.
pub async fn insert_many(db: &Database, txs: Vec<NewTransaction>) -> Result<Vec<i64>, ZelaError> {
    db.connection()
        .call(move |conn| -> Result<Vec<i64>, rusqlite::Error> {
            let batch = conn.transaction()?;
            let ids = txs
                .iter()
                .map(|tx| insert_row(&batch, tx))
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            batch.commit()?;
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: i64) -> Result<Option<TransactionRecord>, ZelaError> {
    db.connection()
        .call(move |conn| -> Result<Option<TransactionRecord>, rusqlite::Error> {
            let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id = ?1");
            match conn.query_row(&sql, params![id], from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Newest first, by occurrence then insertion order.
pub async fn list(
    db: &Database,
    owners: Vec<String>,
    limit: usize,
) -> Result<Vec<TransactionRecord>, ZelaError> {
    if owners.is_empty() {
        return Ok(Vec::new());
    }
    db.connection()
        .call(move |conn| -> Result<Vec<TransactionRecord>, rusqlite::Error> {
            let sql = format!(
                "SELECT {COLUMNS} FROM transactions WHERE owner IN ({}) \
                 ORDER BY occurred_at DESC, id DESC LIMIT ?",
                placeholders(owners.len())
            );
            let mut values: Vec<Value> = owners.into_iter().map(Value::Text).collect();
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
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
                "DELETE FROM transactions WHERE id = ?1 AND owner = ?2",
                params![id, owner],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Totals over the owners' transactions dated `since` (`YYYY-MM-DD`) or later.
pub async fn summary(
    db: &Database,
    owners: Vec<String>,
    since: Option<String>,
) -> Result<LedgerSummary, ZelaError> {
    if owners.is_empty() {
        return Ok(LedgerSummary::default());
    }
    db.connection()
        .call(move |conn| -> Result<LedgerSummary, rusqlite::Error> {
            let sql = format!(
                "SELECT \
                   COALESCE(SUM(CASE WHEN kind = 'entrada' THEN amount END), 0.0), \
                   COALESCE(SUM(CASE WHEN kind = 'saida' THEN amount END), 0.0), \
                   COUNT(*) \
                 FROM transactions WHERE owner IN ({}) AND occurred_on >= ?",
                placeholders(owners.len())
            );
            let mut values: Vec<Value> = owners.into_iter().map(Value::Text).collect();
            values.push(Value::Text(since.unwrap_or_default()));
            conn.query_row(&sql, params_from_iter(values), |row| {
                let income: f64 = row.get(0)?;
                let expenses: f64 = row.get(1)?;
                Ok(LedgerSummary {
                    income,
                    expenses,
                    balance: income - expenses,
                    count: row.get(2)?,
                })
            })
        })
        .await
        .map_err(map_tr_err)
}
