// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short human-facing transaction identifiers.
//!
//! Row ids are rendered as five base-36 characters over `A-Z0-9`, most
//! significant first, so users can type them back in a WhatsApp message.

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const WIDTH: usize = 5;

/// Largest id representable in [`WIDTH`] characters.
pub const MAX_ENCODABLE_ID: i64 = 36_i64.pow(WIDTH as u32) - 1;

/// Renders a row id as a five-character identifier.
///
/// Returns `None` for negative ids or ids above [`MAX_ENCODABLE_ID`].
pub fn encode_identifier(id: i64) -> Option<String> {
    if !(0..=MAX_ENCODABLE_ID).contains(&id) {
        return None;
    }
    let mut rest = id;
    let mut out = [b'A'; WIDTH];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(rest % 36) as usize];
        rest /= 36;
    }
    Some(out.iter().map(|&b| b as char).collect())
}

/// Parses an identifier back into a row id. Case-insensitive.
pub fn decode_identifier(code: &str) -> Option<i64> {
    let code = code.trim();
    if code.len() != WIDTH {
        return None;
    }
    code.bytes().try_fold(0_i64, |acc, b| {
        let upper = b.to_ascii_uppercase();
        let digit = ALPHABET.iter().position(|&c| c == upper)?;
        Some(acc * 36 + digit as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_all_a() {
        assert_eq!(encode_identifier(0).as_deref(), Some("AAAAA"));
    }

    #[test]
    fn small_ids_use_trailing_characters() {
        assert_eq!(encode_identifier(1).as_deref(), Some("AAAAB"));
        assert_eq!(encode_identifier(35).as_deref(), Some("AAAA9"));
        assert_eq!(encode_identifier(36).as_deref(), Some("AAABA"));
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        assert_eq!(encode_identifier(-1), None);
        assert_eq!(encode_identifier(MAX_ENCODABLE_ID + 1), None);
        assert!(encode_identifier(MAX_ENCODABLE_ID).is_some());
    }

    #[test]
    fn decode_is_case_insensitive() {
        assert_eq!(decode_identifier("aaabA"), Some(36));
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(decode_identifier("ABC"), None);
        assert_eq!(decode_identifier("ABCD#"), None);
        assert_eq!(decode_identifier("ABCDEF"), None);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(id in 0..=MAX_ENCODABLE_ID) {
            let code = encode_identifier(id).unwrap();
            prop_assert_eq!(decode_identifier(&code), Some(id));
        }
    }
}
