// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text folding and whole-word phrase matching.

/// Only this many characters of a message are inspected.
pub(crate) const MAX_SCAN_CHARS: usize = 1024;

/// The first [`MAX_SCAN_CHARS`] characters of `text`, cut on a char boundary.
pub(crate) fn scan_window(text: &str) -> &str {
    match text.char_indices().nth(MAX_SCAN_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Lowercases and strips Portuguese diacritics (`mês` -> `mes`, `transação` -> `transacao`).
pub(crate) fn fold(text: &str) -> String {
    text.chars()
        .take(MAX_SCAN_CHARS)
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Splits folded text into alphanumeric words.
pub(crate) fn words(folded: &str) -> Vec<&str> {
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whether `phrase` occurs in `words` as consecutive whole words.
pub(crate) fn has_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split(' ').collect();
    !needle.is_empty() && words.windows(needle.len()).any(|w| w == needle.as_slice())
}

pub(crate) fn has_any_phrase(words: &[&str], phrases: &[&str]) -> bool {
    phrases.iter().any(|p| has_phrase(words, p))
}

/// Whether `words` begins with `phrase`.
pub(crate) fn starts_with_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split(' ').collect();
    words.len() >= needle.len() && words[..needle.len()] == needle[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Excluir Transação"), "excluir transacao");
        assert_eq!(fold("MÊS"), "mes");
        assert_eq!(fold("Você é ótimo"), "voce e otimo");
    }

    #[test]
    fn scan_window_cuts_on_char_boundary() {
        let long = "ç".repeat(MAX_SCAN_CHARS + 10);
        let window = scan_window(&long);
        assert_eq!(window.chars().count(), MAX_SCAN_CHARS);
        assert_eq!(scan_window("oi"), "oi");
    }

    #[test]
    fn fold_truncates_long_input() {
        let long = "a".repeat(MAX_SCAN_CHARS * 2);
        assert_eq!(fold(&long).chars().count(), MAX_SCAN_CHARS);
    }

    #[test]
    fn words_split_on_punctuation() {
        assert_eq!(words("gastei r$50,00 no pix!"), vec!["gastei", "r", "50", "00", "no", "pix"]);
    }

    #[test]
    fn phrases_match_whole_words_only() {
        let w = words("vou pagar o aluguel");
        assert!(has_phrase(&w, "pagar"));
        assert!(!has_phrase(&w, "apagar"));
        assert!(has_phrase(&w, "o aluguel"));
        assert!(!has_phrase(&w, "pag"));
    }

    #[test]
    fn prefix_phrase() {
        let w = words("o que voce faz");
        assert!(starts_with_phrase(&w, "o que"));
        assert!(!starts_with_phrase(&w, "que"));
        assert!(!starts_with_phrase(&[], "o que"));
    }
}
