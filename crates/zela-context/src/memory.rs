// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process expiring store.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use zela_core::{ExpiringStore, ZelaError};

struct Entry {
    value: String,
    deadline: Instant,
}

/// [`ExpiringStore`] backed by a concurrent hash map.
///
/// Deadlines use the tokio clock so tests can drive expiry with
/// `tokio::time::advance`. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ExpiringStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ZelaError> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.deadline > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            // Re-check under the shard lock: a concurrent set may have refreshed it.
            self.entries
                .remove_if(key, |_, entry| entry.deadline <= Instant::now());
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), ZelaError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ZelaError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn sweep(&self) -> Result<usize, ZelaError> {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let live = entry.deadline > now;
            if !live {
                removed += 1;
            }
            live
        });
        Ok(removed)
    }
}
