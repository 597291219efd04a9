// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer session middleware for the portal API.
//!
//! The token issued by `/api/auth/verify-code` is looked up in the session
//! store; the canonical phone it resolves to becomes the caller for every
//! ownership check downstream. Requests without a live session are rejected.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejection;
use zela_identity::PhoneIdentity;

use crate::error::ApiError;
use crate::server::GatewayState;

/// The authenticated caller, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct Caller {
    pub phone: PhoneIdentity,
    pub token: String,
}

impl Caller {
    /// Owner key to hand to storage.
    pub fn owner(&self) -> &str {
        self.phone.digits()
    }
}

/// Resolves `Authorization: Bearer <token>` to a [`Caller`].
pub async fn session_auth(
    State(state): State<GatewayState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Ok(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ApiError::unauthorized());
    };
    let token = bearer.token().to_string();

    let Some(phone) = state.sessions.resolve(&token).await? else {
        tracing::debug!("rejecting request with unknown session token");
        return Err(ApiError::unauthorized());
    };

    request.extensions_mut().insert(Caller { phone, token });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zela_identity::canonicalize;

    #[test]
    fn owner_is_canonical_digits() {
        let caller = Caller {
            phone: canonicalize("whatsapp:+5561981474690"),
            token: "t".into(),
        };
        assert_eq!(caller.owner(), "5561981474690");
    }
}
