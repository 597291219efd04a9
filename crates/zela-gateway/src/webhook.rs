// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp provider webhooks.
//!
//! Z-API posts JSON, Twilio posts a urlencoded form. Both become an
//! [`InboundMessage`] for the shared dispatcher; the reply goes back out
//! through the configured [`MessageSender`](zela_core::MessageSender).

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use zela_agent::DispatchOutcome;
use zela_agent::format::{MAX_MESSAGE_CHARS, split_message};
use zela_core::types::{InboundMessage, OutboundMessage};
use zela_identity::PhoneIdentity;
use zela_router::IntentKind;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Empty TwiML document; replies are sent out of band.
const EMPTY_TWIML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";

/// Z-API "on message received" payload. Only the fields Zela reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZapiPayload {
    #[serde(default)]
    pub phone: Option<String>,
    /// Author of a group message; `phone` is the group itself.
    #[serde(default)]
    pub participant_phone: Option<String>,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub text: Option<ZapiText>,
    /// Older payloads carry the text here, either bare or as `{text}`.
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ZapiText {
    #[serde(default)]
    pub message: Option<String>,
}

impl ZapiPayload {
    fn sender(&self) -> Option<&str> {
        let raw = if self.is_group {
            self.participant_phone.as_deref()
        } else {
            self.phone.as_deref()
        };
        raw.filter(|p| !p.trim().is_empty())
    }

    fn body(&self) -> &str {
        let nested = self.text.as_ref().and_then(|t| t.message.as_deref());
        let legacy = self.message.as_ref().and_then(|m| match m {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(o) => o.get("text").and_then(serde_json::Value::as_str),
            _ => None,
        });
        nested
            .filter(|t| !t.trim().is_empty())
            .or(legacy)
            .unwrap_or("")
    }
}

/// Twilio WhatsApp form fields.
#[derive(Debug, Deserialize)]
pub struct TwilioPayload {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// Webhook acknowledgement.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentKind>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignored: bool,
}

/// POST /webhook/zapi
pub async fn post_zapi(
    State(state): State<GatewayState>,
    Json(payload): Json<ZapiPayload>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Some(sender) = payload.sender() else {
        return Err(ApiError::bad_request("phone is required"));
    };
    let text = payload.body();
    if text.trim().is_empty() {
        return Err(ApiError::bad_request("message is required"));
    }

    let inbound = InboundMessage {
        sender: sender.to_string(),
        text: text.to_string(),
        is_group: payload.is_group,
        channel: "zapi".to_string(),
    };
    Ok(Json(process(&state, &inbound).await?))
}

/// POST /webhook/whatsapp
pub async fn post_twilio(
    State(state): State<GatewayState>,
    Form(payload): Form<TwilioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.body.trim().is_empty() {
        return Err(ApiError::bad_request("Body is required"));
    }
    let inbound = InboundMessage {
        sender: payload.from,
        text: payload.body,
        is_group: false,
        channel: "twilio".to_string(),
    };
    process(&state, &inbound).await?;
    Ok(([(CONTENT_TYPE, "text/xml")], EMPTY_TWIML))
}

async fn process(
    state: &GatewayState,
    inbound: &InboundMessage,
) -> Result<WebhookResponse, ApiError> {
    match state.dispatcher.handle(inbound).await? {
        DispatchOutcome::Ignored => Ok(WebhookResponse {
            success: true,
            intent: None,
            ignored: true,
        }),
        DispatchOutcome::Rejected => Err(ApiError::bad_request("invalid phone number")),
        DispatchOutcome::Replied {
            recipient,
            reply,
            intent,
        } => {
            // Registration lets the number log into the panel later.
            if let Err(e) = state.storage.register_number(recipient.digits()).await {
                warn!(phone = %recipient, error = %e, "failed to register number");
            }
            let delivered = deliver(state, &recipient, &reply).await;
            Ok(WebhookResponse {
                success: delivered,
                intent: Some(intent),
                ignored: false,
            })
        }
    }
}

/// Sends `text` in provider-sized chunks; `false` if any chunk failed.
pub(crate) async fn deliver(state: &GatewayState, to: &PhoneIdentity, text: &str) -> bool {
    for chunk in split_message(text, MAX_MESSAGE_CHARS) {
        let msg = OutboundMessage {
            recipient: to.digits().to_string(),
            text: chunk,
        };
        if let Err(e) = state.sender.send(msg).await {
            warn!(phone = %to, error = %e, "failed to deliver reply");
            return false;
        }
    }
    debug!(phone = %to, "reply delivered");
    true
}
