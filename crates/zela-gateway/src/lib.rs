// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Zela finance assistant.
//!
//! Receives WhatsApp webhooks (Z-API and Twilio) and hands them to the
//! shared [`MessageDispatcher`](zela_agent::MessageDispatcher), and serves
//! the web panel API: WhatsApp code login, then the caller's own
//! transactions and schedules behind a bearer session.

pub mod api;
pub mod auth;
pub mod error;
pub mod sender;
pub mod server;
pub mod webhook;

pub use auth::Caller;
pub use error::{ApiError, ErrorResponse};
pub use sender::LogSender;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
