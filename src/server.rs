//! Webhook HTTP server.
//!
//! `POST /callback` receives platform events. A request whose signature does
//! not match is rejected with 400 before any handler runs; every event in an
//! authenticated request gets exactly one reply.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::bot::BotContext;
use crate::line::{verify_signature, ReplySender, WebhookBody, SIGNATURE_HEADER};

/// Application state shared across webhook handlers
#[derive(Clone)]
pub struct AppState {
    bot: Arc<BotContext>,
    sender: Arc<dyn ReplySender>,
    channel_secret: Arc<str>,
}

impl AppState {
    pub fn new(bot: BotContext, sender: Arc<dyn ReplySender>, channel_secret: &str) -> Self {
        Self {
            bot: Arc::new(bot),
            sender,
            channel_secret: Arc::from(channel_secret),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/callback", post(callback))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(e) = verify_signature(&state.channel_secret, &body, signature) {
        warn!(error = %e, "Rejected webhook request");
        return (StatusCode::BAD_REQUEST, "Invalid signature");
    }

    let payload: WebhookBody = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Webhook body is not a valid event batch");
            return (StatusCode::BAD_REQUEST, "Invalid body");
        }
    };
    debug!(destination = %payload.destination, events = payload.events.len(), "Webhook received");

    for event in payload.into_events() {
        let Some(event) = event.into_inbound() else {
            debug!("Skipping event without reply token");
            continue;
        };

        let reply = state.bot.handle_event(&event);
        if let Err(e) = state.sender.reply(event.reply_token(), &reply).await {
            error!(
                reply_token = %event.reply_token(),
                event_kind = event.kind(),
                error = %e,
                "Failed to send reply"
            );
        }
    }

    (StatusCode::OK, "OK")
}
