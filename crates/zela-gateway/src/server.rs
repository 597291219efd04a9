// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware as axum_middleware};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use zela_agent::MessageDispatcher;
use zela_context::{SessionTokens, VerificationCodes};
use zela_core::{MessageSender, StorageAdapter, ZelaError};

use crate::auth::session_auth;
use crate::{api, webhook};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub dispatcher: Arc<MessageDispatcher>,
    pub storage: Arc<dyn StorageAdapter>,
    /// Outbound channel for replies and verification codes.
    pub sender: Arc<dyn MessageSender>,
    pub codes: Arc<VerificationCodes>,
    pub sessions: Arc<SessionTokens>,
    /// Only numbers that have messaged the bot may request a login code.
    pub require_registration: bool,
}

/// Gateway server configuration (mirrors `GatewayConfig` from zela-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the full route tree.
///
/// Public routes:
/// - GET /health
/// - POST /webhook/zapi, POST /webhook/whatsapp
/// - POST /api/auth/request-code, POST /api/auth/verify-code
///
/// Everything else under /api requires a bearer session.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(api::get_health))
        .route("/webhook/zapi", post(webhook::post_zapi))
        .route("/webhook/whatsapp", post(webhook::post_twilio))
        .route("/api/auth/request-code", post(api::request_code))
        .route("/api/auth/verify-code", post(api::verify_code))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/auth/logout", post(api::logout))
        .route("/api/transactions", get(api::list_transactions))
        .route("/api/transactions/{id}", delete(api::delete_transaction))
        .route("/api/summary", get(api::get_summary))
        .route("/api/schedules", get(api::list_schedules))
        .route("/api/schedules/{id}", delete(api::delete_schedule))
        .route(
            "/api/schedules/{id}/status",
            put(api::update_schedule_status),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `host:port` and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), ZelaError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ZelaError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| ZelaError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway stopped");
    Ok(())
}
