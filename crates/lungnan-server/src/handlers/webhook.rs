//! LINE webhook handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap};
use chrono::Local;
use tracing::{debug, error, warn};

use crate::signature::{verify_signature, SIGNATURE_HEADER};
use crate::{AppError, AppState};
use lungnan_core::line::webhook::{BotEvent, WebhookBody};
use lungnan_core::BudgetAssistant;

/// Banner returned by the liveness route
pub const STATUS_TEXT: &str = "Lung Nan Budget Bot is running";

/// GET / - Liveness check
pub async fn status() -> &'static str {
    STATUS_TEXT
}

/// POST /webhook - Handle LINE events
///
/// Rejects a bad signature with 400. Every readable text event is handled,
/// and replied to when it carries a reply token. After that the answer is
/// always `OK`: a failed event is logged, since a non-2xx status only makes
/// LINE redeliver messages that may already have been recorded.
pub async fn line_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    if let Some(secret) = &state.config.channel_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(secret, &body, signature) {
            warn!("Rejected webhook with invalid signature");
            return Err(AppError::bad_request("Invalid signature"));
        }
    }

    let payload: WebhookBody = serde_json::from_slice(&body).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable webhook body");
        WebhookBody::default()
    });

    let assistant = BudgetAssistant::new(&state.db);
    let today = Local::now().date_naive();

    for event in payload.events() {
        let (reply_token, reply) = match event.as_bot_event() {
            Some(BotEvent::Follow { reply_token }) => (Some(reply_token), assistant.welcome()),
            Some(BotEvent::Text {
                reply_token,
                user_id,
                text,
            }) => match assistant.handle_text(user_id, text, today) {
                Ok(reply) => (reply_token, reply),
                Err(e) => {
                    error!(error = %e, user_id, "Failed to handle message");
                    continue;
                }
            },
            None => {
                debug!(kind = %event.kind, "Skipping webhook event");
                continue;
            }
        };

        let Some(reply_token) = reply_token else {
            debug!("No reply token, reply not sent");
            continue;
        };
        if let Err(e) = state.sender.reply(reply_token, &reply).await {
            warn!(error = %e, "Failed to send LINE reply");
        }
    }

    Ok("OK")
}
