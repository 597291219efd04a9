// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical phone identities.
//!
//! Webhook payloads, session tokens, and stored rows all carry phone numbers
//! in slightly different shapes (`5561981474690`, `+5561981474690`,
//! `whatsapp:+5561981474690`, `(61) 98147-4690`). [`PhoneNormalizer`] reduces
//! each of them to one digit string that always starts with the country code.

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

/// Country code assumed for bare national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Transport prefix Twilio puts in front of WhatsApp senders.
const TRANSPORT_PREFIX: &str = "whatsapp:";

/// Key reported by the sentinel identity.
const UNKNOWN_KEY: &str = "unknown";

/// National numbers are a 2-digit area code plus 8 or 9 subscriber digits.
const NATIONAL_LEN: std::ops::RangeInclusive<usize> = 10..=11;

/// A subscriber's phone number in canonical form.
///
/// Equality and hashing look at [`digits`](Self::digits) only: whether the
/// raw value carried a `whatsapp:` prefix is provenance, not identity.
#[derive(Debug, Clone)]
pub struct PhoneIdentity {
    digits: String,
    country_code: String,
    has_messaging_prefix: bool,
}

impl PhoneIdentity {
    /// The identity that malformed input degrades to. It matches nothing,
    /// not even itself.
    pub fn unknown() -> Self {
        Self {
            digits: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            has_messaging_prefix: false,
        }
    }

    /// Digits including the country code; empty for the sentinel.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Whether the raw value carried a `whatsapp:` transport prefix.
    pub fn has_messaging_prefix(&self) -> bool {
        self.has_messaging_prefix
    }

    pub fn is_unknown(&self) -> bool {
        self.digits.is_empty()
    }

    /// Store key for this subscriber: the digits, or `"unknown"` for the sentinel.
    pub fn key(&self) -> &str {
        if self.is_unknown() {
            UNKNOWN_KEY
        } else {
            &self.digits
        }
    }

    /// Area code plus subscriber number, without the country code.
    pub fn national(&self) -> &str {
        self.digits.get(self.country_code.len()..).unwrap_or("")
    }
}

impl PartialEq for PhoneIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for PhoneIdentity {}

impl Hash for PhoneIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl fmt::Display for PhoneIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Canonicalizes raw phone strings for one country code.
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    country_code: String,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CODE)
    }
}

impl PhoneNormalizer {
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Reduces `raw` to a canonical identity.
    ///
    /// Never fails: anything that is not a plausible number for the
    /// configured country becomes [`PhoneIdentity::unknown`].
    pub fn canonicalize(&self, raw: &str) -> PhoneIdentity {
        let trimmed = raw.trim();
        let (rest, has_messaging_prefix) = match trimmed.get(..TRANSPORT_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(TRANSPORT_PREFIX) => {
                (trimmed[TRANSPORT_PREFIX.len()..].trim_start(), true)
            }
            _ => (trimmed, false),
        };
        let rest = rest.strip_prefix('+').unwrap_or(rest);
        let digits: String = rest.chars().filter(char::is_ascii_digit).collect();

        let digits = if self.is_canonical(&digits) {
            digits
        } else if NATIONAL_LEN.contains(&digits.len()) {
            format!("{}{digits}", self.country_code)
        } else {
            digits
        };

        if !self.is_canonical(&digits) {
            debug!(raw_len = raw.len(), "malformed phone number, using unknown identity");
            return PhoneIdentity::unknown();
        }

        PhoneIdentity {
            digits,
            country_code: self.country_code.clone(),
            has_messaging_prefix,
        }
    }

    /// Country code followed by an area code (no leading zero) and 8 or 9 digits.
    fn is_canonical(&self, digits: &str) -> bool {
        if self.country_code.is_empty() {
            return false;
        }
        let Some(national) = digits.strip_prefix(self.country_code.as_str()) else {
            return false;
        };
        NATIONAL_LEN.contains(&national.len())
            && !national.starts_with('0')
            && national.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Canonicalizes `raw` with the default country code.
pub fn canonicalize(raw: &str) -> PhoneIdentity {
    PhoneNormalizer::default().canonicalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn strips_transport_prefix_and_plus() {
        let id = canonicalize("whatsapp:+5561981474690");
        assert_eq!(id.digits(), "5561981474690");
        assert!(id.has_messaging_prefix());
        assert_eq!(id.country_code(), "55");
    }

    #[test]
    fn transport_prefix_is_case_insensitive() {
        let id = canonicalize("WhatsApp:+5561981474690");
        assert_eq!(id.digits(), "5561981474690");
        assert!(id.has_messaging_prefix());
    }

    #[test]
    fn national_numbers_get_country_code() {
        assert_eq!(canonicalize("61981474690").digits(), "5561981474690");
        assert_eq!(canonicalize("6181474690").digits(), "556181474690");
    }

    #[test]
    fn formatting_characters_are_dropped() {
        assert_eq!(canonicalize("(61) 98147-4690").digits(), "5561981474690");
        assert_eq!(canonicalize(" +55 61 9 8147 4690 ").digits(), "5561981474690");
    }

    #[test]
    fn area_code_55_is_not_mistaken_for_country_code() {
        // 11-digit national number in area code 55.
        assert_eq!(canonicalize("55991234567").digits(), "5555991234567");
    }

    #[test]
    fn equality_ignores_prefix_provenance() {
        assert_eq!(
            canonicalize("whatsapp:+5561981474690"),
            canonicalize("5561981474690")
        );
    }

    #[test]
    fn national_part_excludes_country_code() {
        assert_eq!(canonicalize("5561981474690").national(), "61981474690");
        assert_eq!(PhoneIdentity::unknown().national(), "");
    }

    #[traced_test]
    #[test]
    fn malformed_input_becomes_unknown() {
        for raw in ["", "   ", "abc", "whatsapp:", "+", "123", "0061981474690", "12345678901234"] {
            let id = canonicalize(raw);
            assert!(id.is_unknown(), "{raw:?} should be unknown");
            assert_eq!(id.key(), "unknown");
        }
        assert!(logs_contain("malformed phone number"));
    }

    #[test]
    fn area_code_cannot_start_with_zero() {
        assert!(canonicalize("0181474690").is_unknown());
    }

    #[test]
    fn other_country_codes_are_rejected_by_default() {
        assert!(canonicalize("+4915123456789").is_unknown());
    }

    #[test]
    fn custom_country_code() {
        let normalizer = PhoneNormalizer::new("351");
        let id = normalizer.canonicalize("2123456789");
        assert_eq!(id.digits(), "3512123456789");
        assert_eq!(normalizer.canonicalize(id.digits()), id);
    }

    #[test]
    fn display_uses_key() {
        assert_eq!(canonicalize("5561981474690").to_string(), "5561981474690");
        assert_eq!(PhoneIdentity::unknown().to_string(), "unknown");
    }
}
