// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone identity reconciliation.
//!
//! Every phone number that crosses a boundary (webhook sender, session
//! token, stored row owner) goes through [`canonicalize`] before use, and
//! two numbers are compared only through [`matches`]. Nothing in this crate
//! fails: malformed input becomes a sentinel identity that matches nothing.

pub mod ownership;
pub mod phone;
pub mod variants;

pub use ownership::authorize_owner;
pub use phone::{DEFAULT_COUNTRY_CODE, PhoneIdentity, PhoneNormalizer, canonicalize};
pub use variants::{PhoneVariantSet, expand_variants, matches};
