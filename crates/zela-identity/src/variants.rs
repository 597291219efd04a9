// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Equivalent spellings of one subscriber and the matching rule built on them.
//!
//! Brazil moved mobile numbers from 8 to 9 subscriber digits by prefixing a
//! `9`. Rows written before and after the migration, and carriers that still
//! report the short form, mean the same subscriber can appear as
//! `556181474690` or `5561981474690`.

use std::collections::BTreeSet;

use crate::phone::{PhoneIdentity, canonicalize};

const BRAZIL: &str = "55";
const AREA_CODE_LEN: usize = 2;

/// Every string form considered equivalent to one identity.
///
/// Ordered so iteration and SQL parameter lists are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneVariantSet(BTreeSet<String>);

impl PhoneVariantSet {
    pub fn contains(&self, form: &str) -> bool {
        self.0.contains(form)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: every set carries at least the three base forms.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn intersects(&self, other: &PhoneVariantSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// The digit-only members, i.e. the forms stored as row owners.
    pub fn digit_forms(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a PhoneVariantSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Expands an identity into its equivalent forms.
///
/// Always contains `digits`, `+digits` and `whatsapp:+digits`. For Brazilian
/// mobile numbers the same three forms of the other subscriber length are
/// added: a 9-digit subscriber starting with `9` also yields the 8-digit
/// form, and an 8-digit subscriber not starting with `9` also yields the
/// 9-digit form.
pub fn expand_variants(identity: &PhoneIdentity) -> PhoneVariantSet {
    let mut forms = BTreeSet::new();
    push_forms(&mut forms, identity.key());
    if let Some(alternate) = alternate_digits(identity) {
        push_forms(&mut forms, &alternate);
    }
    PhoneVariantSet(forms)
}

fn push_forms(forms: &mut BTreeSet<String>, core: &str) {
    forms.insert(core.to_string());
    forms.insert(format!("+{core}"));
    forms.insert(format!("whatsapp:+{core}"));
}

fn alternate_digits(identity: &PhoneIdentity) -> Option<String> {
    if identity.is_unknown() || identity.country_code() != BRAZIL {
        return None;
    }
    let national = identity.national();
    let area = national.get(..AREA_CODE_LEN)?;
    let subscriber = national.get(AREA_CODE_LEN..)?;
    match subscriber.len() {
        9 if subscriber.starts_with('9') => Some(format!("{BRAZIL}{area}{}", &subscriber[1..])),
        8 if !subscriber.starts_with('9') => Some(format!("{BRAZIL}{area}9{subscriber}")),
        _ => None,
    }
}

impl PhoneIdentity {
    /// Whether two identities denote the same subscriber.
    ///
    /// The sentinel matches nothing, including another sentinel.
    pub fn matches(&self, other: &PhoneIdentity) -> bool {
        if self.is_unknown() || other.is_unknown() {
            return false;
        }
        self == other || expand_variants(self).intersects(&expand_variants(other))
    }

    pub fn variants(&self) -> PhoneVariantSet {
        expand_variants(self)
    }
}

/// Canonicalizes both raw strings and compares them with [`PhoneIdentity::matches`].
///
/// The only supported way to decide whether a stored owner is the caller.
pub fn matches(raw_a: &str, raw_b: &str) -> bool {
    canonicalize(raw_a).matches(&canonicalize(raw_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_forms_always_present() {
        let set = expand_variants(&canonicalize("5561981474690"));
        assert!(set.contains("5561981474690"));
        assert!(set.contains("+5561981474690"));
        assert!(set.contains("whatsapp:+5561981474690"));
    }

    #[test]
    fn nine_digit_subscriber_adds_short_form() {
        let set = expand_variants(&canonicalize("5561981474690"));
        assert_eq!(set.len(), 6);
        assert!(set.contains("556181474690"));
        assert!(set.contains("whatsapp:+556181474690"));
    }

    #[test]
    fn eight_digit_subscriber_adds_long_form() {
        let set = expand_variants(&canonicalize("556181474690"));
        assert!(set.contains("5561981474690"));
        assert!(set.contains("+5561981474690"));
    }

    #[test]
    fn eight_digit_subscriber_starting_with_nine_has_no_alternate() {
        let set = expand_variants(&canonicalize("556191474690"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn nine_digit_subscriber_not_starting_with_nine_has_no_alternate() {
        let set = expand_variants(&canonicalize("5561381474690"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn sentinel_set_is_not_empty_and_matches_no_stored_owner() {
        let set = expand_variants(&PhoneIdentity::unknown());
        assert_eq!(set.len(), 3);
        assert!(set.digit_forms().is_empty());
    }

    #[test]
    fn digit_forms_exclude_prefixed_members() {
        let forms = expand_variants(&canonicalize("5561981474690")).digit_forms();
        assert_eq!(forms, vec!["556181474690".to_string(), "5561981474690".to_string()]);
    }

    #[test]
    fn matching_crosses_prefixes_and_lengths() {
        assert!(matches("whatsapp:+5561981474690", "5561981474690"));
        assert!(matches("556181474690", "5561981474690"));
        assert!(matches("5561981474690", "556181474690"));
        assert!(matches("+55 (61) 98147-4690", "61981474690"));
    }

    #[test]
    fn different_subscribers_do_not_match() {
        assert!(!matches("5561981474690", "5561981474691"));
        assert!(!matches("5561981474690", "5511981474690"));
    }

    #[test]
    fn sentinel_never_matches() {
        assert!(!matches("", ""));
        assert!(!matches("abc", "abc"));
        assert!(!matches("", "5561981474690"));
        let unknown = PhoneIdentity::unknown();
        assert!(!unknown.matches(&unknown));
    }
}
