// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialized access to conversation contexts.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zela_config::model::ContextConfig;
use zela_core::{ExpiringStore, ZelaError};
use zela_identity::PhoneIdentity;

use crate::conversation::{ConversationContext, Role};

const KEY_PREFIX: &str = "ctx:";

/// Loads, mutates, and saves conversation contexts in an [`ExpiringStore`].
///
/// Every write goes through [`update`](Self::update), which holds a per-key
/// lock for the whole read-modify-write. Two webhooks for the same subscriber
/// therefore apply one after the other; different subscribers never wait on
/// each other. Each save refreshes the inactivity TTL.
pub struct ContextManager {
    store: Arc<dyn ExpiringStore>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    ttl: Duration,
    max_messages: usize,
}

impl ContextManager {
    pub fn new(store: Arc<dyn ExpiringStore>, ttl: Duration, max_messages: usize) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            ttl,
            max_messages,
        }
    }

    pub fn from_config(store: Arc<dyn ExpiringStore>, config: &ContextConfig) -> Self {
        Self::new(
            store,
            Duration::from_secs(config.ttl_secs),
            config.max_messages,
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current context for `who`, or `None` if absent or expired.
    pub async fn get(&self, who: &PhoneIdentity) -> Result<Option<ConversationContext>, ZelaError> {
        let key = store_key(who)?;
        self.load(&key).await
    }

    /// Applies `f` to the subscriber's context (a fresh one if none is live)
    /// and saves the result.
    pub async fn update<F, R>(&self, who: &PhoneIdentity, f: F) -> Result<R, ZelaError>
    where
        F: FnOnce(&mut ConversationContext) -> R,
    {
        let key = store_key(who)?;
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let mut context = self
            .load(&key)
            .await?
            .unwrap_or_else(|| ConversationContext::new(who.key()));
        let out = f(&mut context);
        context.last_updated = Utc::now();
        self.save(&key, &context).await?;
        Ok(out)
    }

    /// Appends one message to the subscriber's history.
    pub async fn add_message(
        &self,
        who: &PhoneIdentity,
        role: Role,
        text: &str,
    ) -> Result<(), ZelaError> {
        let max = self.max_messages;
        self.update(who, |ctx| ctx.add_message(role, text, max)).await
    }

    /// Forgets the subscriber's context entirely.
    pub async fn clear(&self, who: &PhoneIdentity) -> Result<(), ZelaError> {
        let key = store_key(who)?;
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;
        self.store.delete(&key).await
    }

    /// Purges expired contexts and drops locks nobody is holding.
    pub async fn sweep(&self) -> Result<usize, ZelaError> {
        let removed = self.store.sweep().await?;
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        debug!(removed, locks = self.locks.len(), "context sweep");
        Ok(removed)
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks.entry(key.to_string()).or_default().clone()
    }

    async fn load(&self, key: &str) -> Result<Option<ConversationContext>, ZelaError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(context) => Ok(Some(context)),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable conversation context");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, context: &ConversationContext) -> Result<(), ZelaError> {
        let json = serde_json::to_string(context)
            .map_err(|e| ZelaError::Internal(format!("context serialization failed: {e}")))?;
        self.store.set(key, json, self.ttl).await
    }
}

fn store_key(who: &PhoneIdentity) -> Result<String, ZelaError> {
    if who.is_unknown() {
        return Err(ZelaError::Validation(
            "conversation context requires a known phone".into(),
        ));
    }
    Ok(format!("{KEY_PREFIX}{}", who.key()))
}
