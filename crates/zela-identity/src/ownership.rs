// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ownership gate for mutations on stored resources.

use std::fmt::Display;

use tracing::warn;
use zela_core::ZelaError;

use crate::phone::{PhoneIdentity, PhoneNormalizer};

/// Allows the mutation only if `stored_owner` is the same subscriber as `caller`.
///
/// The stored owner is read with the caller's country code. A mismatch, or
/// either side being unparseable, is [`ZelaError::Forbidden`].
/// Whether the resource exists is the caller's concern: check that first and
/// return [`ZelaError::NotFound`].
pub fn authorize_owner(
    resource: &'static str,
    id: impl Display,
    stored_owner: &str,
    caller: &PhoneIdentity,
) -> Result<(), ZelaError> {
    let stored = PhoneNormalizer::new(caller.country_code()).canonicalize(stored_owner);
    if stored.matches(caller) {
        return Ok(());
    }
    let id = id.to_string();
    warn!(resource, id = %id, caller = %caller, "ownership check failed");
    Err(ZelaError::Forbidden { resource, id })
}
