// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer session tokens for the web panel API.

use std::sync::Arc;
use std::time::Duration;

use zela_core::{ExpiringStore, ZelaError};
use zela_identity::{PhoneIdentity, PhoneNormalizer};

const KEY_PREFIX: &str = "session:";

/// Maps opaque tokens to the phone that logged in.
pub struct SessionTokens {
    store: Arc<dyn ExpiringStore>,
    normalizer: PhoneNormalizer,
    ttl: Duration,
}

impl SessionTokens {
    pub fn new(store: Arc<dyn ExpiringStore>, normalizer: PhoneNormalizer, ttl: Duration) -> Self {
        Self {
            store,
            normalizer,
            ttl,
        }
    }

    /// Opens a session for a verified phone.
    pub async fn create(&self, who: &PhoneIdentity) -> Result<String, ZelaError> {
        if who.is_unknown() {
            return Err(ZelaError::Validation("session requires a known phone".into()));
        }
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.store
            .set(&store_key(&token), who.digits().to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    /// The phone behind `token`, if the session is live.
    ///
    /// The stored value is canonicalized again on the way out, so a session
    /// never yields a raw phone string.
    pub async fn resolve(&self, token: &str) -> Result<Option<PhoneIdentity>, ZelaError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let stored = self.store.get(&store_key(token)).await?;
        Ok(stored
            .map(|digits| self.normalizer.canonicalize(&digits))
            .filter(|who| !who.is_unknown()))
    }

    pub async fn revoke(&self, token: &str) -> Result<(), ZelaError> {
        self.store.delete(&store_key(token.trim())).await
    }
}

fn store_key(token: &str) -> String {
    format!("{KEY_PREFIX}{token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use zela_identity::canonicalize;

    fn sessions(ttl: Duration) -> SessionTokens {
        SessionTokens::new(Arc::new(MemoryStore::new()), PhoneNormalizer::default(), ttl)
    }

    #[tokio::test]
    async fn token_resolves_to_canonical_phone() {
        let sessions = sessions(Duration::from_secs(60));
        let who = canonicalize("whatsapp:+5561981474690");
        let token = sessions.create(&who).await.unwrap();

        assert_eq!(token.len(), 32);
        assert_eq!(sessions.resolve(&token).await.unwrap(), Some(who));
        assert_eq!(sessions.resolve("bogus").await.unwrap(), None);
        assert_eq!(sessions.resolve("  ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn revoked_token_is_gone() {
        let sessions = sessions(Duration::from_secs(60));
        let token = sessions.create(&canonicalize("5561981474690")).await.unwrap();
        sessions.revoke(&token).await.unwrap();
        assert_eq!(sessions.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn token_expires() {
        let sessions = sessions(Duration::from_secs(60));
        let token = sessions.create(&canonicalize("5561981474690")).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(sessions.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_phone_cannot_open_session() {
        let sessions = sessions(Duration::from_secs(60));
        assert!(sessions.create(&PhoneIdentity::unknown()).await.is_err());
    }
}
