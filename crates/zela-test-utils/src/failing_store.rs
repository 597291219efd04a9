// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expiring store whose every operation fails.

use std::time::Duration;

use async_trait::async_trait;
use zela_core::{ExpiringStore, ZelaError};

/// Simulates an unreachable context backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

fn unavailable() -> ZelaError {
    ZelaError::Storage {
        source: "expiring store unavailable".into(),
    }
}

#[async_trait]
impl ExpiringStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, ZelaError> {
        Err(unavailable())
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), ZelaError> {
        Err(unavailable())
    }

    async fn delete(&self, _key: &str) -> Result<(), ZelaError> {
        Err(unavailable())
    }

    async fn sweep(&self) -> Result<usize, ZelaError> {
        Err(unavailable())
    }
}
