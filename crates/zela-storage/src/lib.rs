// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Zela finance assistant.
//!
//! One WAL-mode database holds the ledger (transactions and schedules), the
//! registered numbers, and the expiring key-value entries behind conversation
//! contexts, login codes, and sessions. Schema changes ship as refinery
//! migrations embedded at build time.

pub mod adapter;
pub mod database;
pub mod kv_store;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use kv_store::SqliteExpiringStore;
