// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expiring key-value store capability.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ZelaError;

/// Keyed store whose entries disappear after a time-to-live.
///
/// Expiry is checked on every read: an entry past its deadline is reported
/// absent even if no sweep has run yet.
#[async_trait]
pub trait ExpiringStore: Send + Sync + 'static {
    /// Returns the live value for `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, ZelaError>;

    /// Stores `value` under `key`, replacing any previous value and deadline.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), ZelaError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), ZelaError>;

    /// Purges expired entries and returns how many were removed.
    async fn sweep(&self) -> Result<usize, ZelaError>;
}
