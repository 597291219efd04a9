// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portal API: code login and the caller's own ledger.
//!
//! Every ledger route acts on behalf of the [`Caller`] resolved by
//! [`session_auth`](crate::auth::session_auth). Owner arguments are never
//! taken from the request body or query.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use zela_core::types::{LedgerSummary, ScheduleRecord, ScheduleStatus, TransactionRecord};
use zela_core::{decode_identifier, encode_identifier};

use crate::auth::Caller;
use crate::error::ApiError;
use crate::server::GatewayState;
use crate::webhook::deliver;

/// Default page size for transaction listings.
const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// --- Auth ---

#[derive(Debug, Deserialize)]
pub struct RequestCodeBody {
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct RequestCodeResponse {
    pub success: bool,
    pub phone: String,
}

/// POST /api/auth/request-code
pub async fn request_code(
    State(state): State<GatewayState>,
    Json(body): Json<RequestCodeBody>,
) -> Result<Json<RequestCodeResponse>, ApiError> {
    let who = state.dispatcher.normalizer().canonicalize(&body.phone);
    if who.is_unknown() {
        return Err(ApiError::bad_request("invalid phone number"));
    }
    if state.require_registration && !state.storage.is_registered(who.digits()).await? {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "number not registered; send a WhatsApp message first",
        ));
    }

    let (who, code) = state.codes.issue(who.digits()).await?;
    let minutes = state.codes.ttl().as_secs().div_ceil(60);
    if !deliver(&state, &who, &code_message(&code, minutes)).await {
        return Err(ApiError::new(
            StatusCode::BAD_GATEWAY,
            "failed to deliver verification code",
        ));
    }

    Ok(Json(RequestCodeResponse {
        success: true,
        phone: who.digits().to_string(),
    }))
}

fn code_message(code: &str, minutes: u64) -> String {
    format!(
        "🔐 Seu código de verificação Zela é: *{code}*\n\n\
         Este código expira em {minutes} minutos.\n\n\
         Se você não solicitou este código, ignore esta mensagem."
    )
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeBody {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub phone: String,
}

/// POST /api/auth/verify-code
pub async fn verify_code(
    State(state): State<GatewayState>,
    Json(body): Json<VerifyCodeBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    if body.phone.trim().is_empty() || body.code.trim().is_empty() {
        return Err(ApiError::bad_request("phone and code are required"));
    }
    let Some(who) = state.codes.verify(&body.phone, &body.code).await? else {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "invalid or expired code",
        ));
    };
    let token = state.sessions.create(&who).await?;
    info!(phone = %who, "panel session opened");
    Ok(Json(SessionResponse {
        success: true,
        token,
        phone: who.digits().to_string(),
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
) -> Result<StatusCode, ApiError> {
    state.sessions.revoke(&caller.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Transactions ---

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// A transaction plus the code users type to delete it over WhatsApp.
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub identifier: Option<String>,
    #[serde(flatten)]
    pub record: TransactionRecord,
}

impl From<TransactionRecord> for TransactionView {
    fn from(record: TransactionRecord) -> Self {
        Self {
            identifier: encode_identifier(record.id),
            record,
        }
    }
}

/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TransactionView>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = state
        .storage
        .list_transactions(caller.owner(), limit)
        .await?;
    Ok(Json(records.into_iter().map(TransactionView::from).collect()))
}

/// DELETE /api/transactions/{id}
///
/// `id` is either the numeric row id or the five-character identifier.
pub async fn delete_transaction(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_transaction_id(&id)
        .ok_or_else(|| ApiError::bad_request("invalid transaction id"))?;
    state.storage.delete_transaction(id, caller.owner()).await?;
    info!(phone = %caller.phone, id, "transaction deleted via panel");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_transaction_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok();
    }
    decode_identifier(raw)
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// `YYYY-MM-DD`; omitted means all time.
    pub since: Option<NaiveDate>,
}

/// GET /api/summary
pub async fn get_summary(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<LedgerSummary>, ApiError> {
    Ok(Json(state.storage.summary(caller.owner(), query.since).await?))
}

// --- Schedules ---

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub status: Option<ScheduleStatus>,
}

/// GET /api/schedules
pub async fn list_schedules(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleRecord>>, ApiError> {
    Ok(Json(
        state
            .storage
            .list_schedules(caller.owner(), query.status)
            .await?,
    ))
}

/// DELETE /api/schedules/{id}
pub async fn delete_schedule(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.storage.delete_schedule(id, caller.owner()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: ScheduleStatus,
}

/// PUT /api/schedules/{id}/status
pub async fn update_schedule_status(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<StatusCode, ApiError> {
    state
        .storage
        .update_schedule_status(id, caller.owner(), body.status)
        .await?;
    info!(phone = %caller.phone, id, status = %body.status, "schedule status updated");
    Ok(StatusCode::NO_CONTENT)
}
