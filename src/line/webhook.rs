//! Webhook request body.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::bot::InboundEvent;

#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: String,
    /// Raw events, decoded one at a time by [`WebhookBody::into_events`]
    #[serde(default)]
    pub events: Vec<Value>,
}

impl WebhookBody {
    /// Decode every event; one of unexpected shape is skipped without
    /// affecting the rest of the batch
    pub fn into_events(self) -> Vec<WebhookEvent> {
        self.events
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<WebhookEvent>(value) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed webhook event");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: Option<String>,
        message: EventMessage,
    },
    Postback {
        #[serde(rename = "replyToken")]
        reply_token: Option<String>,
        postback: PostbackContent,
    },
    Follow {
        #[serde(rename = "replyToken")]
        reply_token: Option<String>,
    },
    /// Unfollow, join, beacon and other events the bot does not answer
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventMessage {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

impl WebhookEvent {
    /// Convert to a bot event; `None` for events that cannot be replied to
    pub fn into_inbound(self) -> Option<InboundEvent> {
        match self {
            WebhookEvent::Message {
                reply_token: Some(reply_token),
                message,
            } => Some(match message {
                EventMessage::Text { text } => InboundEvent::Message { text, reply_token },
                EventMessage::Other => InboundEvent::UnsupportedMessage { reply_token },
            }),
            WebhookEvent::Postback {
                reply_token: Some(reply_token),
                postback,
            } => Some(InboundEvent::Postback {
                data: postback.data,
                reply_token,
            }),
            WebhookEvent::Follow {
                reply_token: Some(reply_token),
            } => Some(InboundEvent::Follow { reply_token }),
            _ => None,
        }
    }
}
