// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time login codes delivered over WhatsApp.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zela_core::{ExpiringStore, ZelaError};
use zela_identity::{PhoneIdentity, PhoneNormalizer};

const KEY_PREFIX: &str = "code:";
const ATTEMPTS_PREFIX: &str = "code_attempts:";

/// Wrong guesses allowed before the outstanding code is burned.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Codes live five minutes unless configured otherwise.
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(300);

/// Issues and checks six-digit verification codes.
///
/// Codes are keyed by canonical phone, so a code requested for
/// `+5561981474690` verifies for `whatsapp:+5561981474690` too. After
/// [`MAX_FAILED_ATTEMPTS`] wrong guesses the code is deleted and a new one
/// must be requested.
pub struct VerificationCodes {
    store: Arc<dyn ExpiringStore>,
    normalizer: PhoneNormalizer,
    ttl: Duration,
    // Serializes verify so a code cannot be redeemed twice concurrently.
    redeem: Mutex<()>,
}

impl VerificationCodes {
    pub fn new(store: Arc<dyn ExpiringStore>, normalizer: PhoneNormalizer, ttl: Duration) -> Self {
        Self {
            store,
            normalizer,
            ttl,
            redeem: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generates a fresh code for `phone`, replacing any outstanding one.
    ///
    /// Returns the canonical identity alongside the code so the caller knows
    /// where to deliver it.
    pub async fn issue(&self, phone: &str) -> Result<(PhoneIdentity, String), ZelaError> {
        let who = self.normalizer.canonicalize(phone);
        if who.is_unknown() {
            return Err(ZelaError::Validation("invalid phone number".into()));
        }
        let code = rand::thread_rng().gen_range(100_000..=999_999u32).to_string();
        self.store
            .set(&store_key(&who), code.clone(), self.ttl)
            .await?;
        self.store.delete(&attempts_key(&who)).await?;
        info!(phone = %who, "verification code issued");
        Ok((who, code))
    }

    /// Redeems `code` for `phone`. Succeeds at most once per issued code.
    pub async fn verify(&self, phone: &str, code: &str) -> Result<Option<PhoneIdentity>, ZelaError> {
        let who = self.normalizer.canonicalize(phone);
        if who.is_unknown() {
            return Ok(None);
        }
        let submitted: String = code.chars().filter(|c| !c.is_whitespace()).collect();
        let key = store_key(&who);

        let _guard = self.redeem.lock().await;
        match self.store.get(&key).await? {
            Some(expected) if expected == submitted => {
                self.store.delete(&key).await?;
                self.store.delete(&attempts_key(&who)).await?;
                info!(phone = %who, "verification code accepted");
                Ok(Some(who))
            }
            Some(_) => {
                let misses = self.record_miss(&who).await?;
                if misses >= MAX_FAILED_ATTEMPTS {
                    self.store.delete(&key).await?;
                    warn!(phone = %who, misses, "verification code burned after repeated misses");
                } else {
                    debug!(phone = %who, misses, "verification code mismatch");
                }
                Ok(None)
            }
            None => {
                debug!(phone = %who, "no live verification code");
                Ok(None)
            }
        }
    }
}

impl VerificationCodes {
    /// Bumps the miss counter for `who` and returns the new count.
    async fn record_miss(&self, who: &PhoneIdentity) -> Result<u32, ZelaError> {
        let key = attempts_key(who);
        let misses = self
            .store
            .get(&key)
            .await?
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;
        self.store.set(&key, misses.to_string(), self.ttl).await?;
        Ok(misses)
    }
}

fn store_key(who: &PhoneIdentity) -> String {
    format!("{KEY_PREFIX}{}", who.key())
}

fn attempts_key(who: &PhoneIdentity) -> String {
    format!("{ATTEMPTS_PREFIX}{}", who.key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn codes() -> VerificationCodes {
        VerificationCodes::new(
            Arc::new(MemoryStore::new()),
            PhoneNormalizer::default(),
            DEFAULT_CODE_TTL,
        )
    }

    #[tokio::test]
    async fn issued_code_is_six_digits() {
        let (who, code) = codes().issue("+5561981474690").await.unwrap();
        assert_eq!(who.digits(), "5561981474690");
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));
        assert_ne!(code.as_bytes()[0], b'0');
    }

    #[tokio::test]
    async fn code_is_single_use_across_phone_forms() {
        let codes = codes();
        let (_, code) = codes.issue("5561981474690").await.unwrap();
        let spaced = format!(" {} {} ", &code[..3], &code[3..]);

        let who = codes
            .verify("whatsapp:+5561981474690", &spaced)
            .await
            .unwrap();
        assert_eq!(who.map(|w| w.digits().to_string()).as_deref(), Some("5561981474690"));
        assert!(codes.verify("5561981474690", &code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_code_does_not_consume_the_right_one() {
        let codes = codes();
        let (_, code) = codes.issue("5561981474690").await.unwrap();
        let wrong = if code == "123456" { "654321" } else { "123456" };
        assert!(codes.verify("5561981474690", wrong).await.unwrap().is_none());
        assert!(codes.verify("5561981474690", &code).await.unwrap().is_some());
    }

    fn wrong_for(code: &str) -> &'static str {
        if code == "123456" { "654321" } else { "123456" }
    }

    #[tokio::test]
    async fn repeated_misses_burn_the_code() {
        let codes = codes();
        let (_, code) = codes.issue("5561981474690").await.unwrap();
        for _ in 0..MAX_FAILED_ATTEMPTS {
            assert!(codes.verify("5561981474690", wrong_for(&code)).await.unwrap().is_none());
        }
        assert!(codes.verify("5561981474690", &code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn misses_count_across_phone_forms() {
        let codes = codes();
        let (_, code) = codes.issue("5561981474690").await.unwrap();
        let wrong = wrong_for(&code);
        for phone in [
            "5561981474690",
            "+5561981474690",
            "whatsapp:+5561981474690",
            "61981474690",
            "+55 (61) 98147-4690",
        ] {
            assert!(codes.verify(phone, wrong).await.unwrap().is_none());
        }
        assert!(codes.verify("5561981474690", &code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reissue_resets_the_miss_counter() {
        let codes = codes();
        let (_, first) = codes.issue("5561981474690").await.unwrap();
        for _ in 0..MAX_FAILED_ATTEMPTS - 1 {
            codes.verify("5561981474690", wrong_for(&first)).await.unwrap();
        }
        let (_, second) = codes.issue("5561981474690").await.unwrap();
        codes.verify("5561981474690", wrong_for(&second)).await.unwrap();
        assert!(codes.verify("5561981474690", &second).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn reissue_replaces_previous_code() {
        let codes = codes();
        let (_, first) = codes.issue("5561981474690").await.unwrap();
        let (_, second) = codes.issue("5561981474690").await.unwrap();
        if first != second {
            assert!(codes.verify("5561981474690", &first).await.unwrap().is_none());
        }
        assert!(codes.verify("5561981474690", &second).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_code_fails() {
        let codes = codes();
        let (_, code) = codes.issue("5561981474690").await.unwrap();
        tokio::time::advance(DEFAULT_CODE_TTL).await;
        assert!(codes.verify("5561981474690", &code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_phone() {
        let codes = codes();
        assert!(matches!(
            codes.issue("abc").await,
            Err(ZelaError::Validation(_))
        ));
        assert!(codes.verify("abc", "123456").await.unwrap().is_none());
    }
}
