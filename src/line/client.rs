//! Reply API client.
//!
//! Renders a [`Reply`] into the platform's message objects and sends it with
//! the reply token of the event being answered. A failed send is reported to
//! the caller and not retried.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::reply::{FacilityBubble, Reply};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";

/// Anything able to deliver a reply for an event
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply_token: &str, reply: &Reply) -> Result<()>;
}

/// Messaging API client backed by `reqwest`
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    access_token: String,
    api_base: String,
}

impl LineClient {
    pub fn new(access_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: access_token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(&self, reply_token: &str, reply: &Reply) -> Result<()> {
        let body = json!({
            "replyToken": reply_token,
            "messages": [render_message(reply)],
        });

        let response = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.api_base))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("reply API returned {status}: {detail}");
        }

        debug!(reply_token = %reply_token, "Reply delivered");
        Ok(())
    }
}

/// Platform message object for `reply`
pub fn render_message(reply: &Reply) -> Value {
    match reply {
        Reply::Text { text } => json!({ "type": "text", "text": text }),
        Reply::Choices { text, choices } => json!({
            "type": "text",
            "text": text,
            "quickReply": {
                "items": choices
                    .iter()
                    .map(|choice| json!({
                        "type": "action",
                        "action": {
                            "type": "postback",
                            "label": choice.label,
                            "data": choice.data,
                            "displayText": choice.label,
                        }
                    }))
                    .collect::<Vec<_>>(),
            },
        }),
        Reply::Carousel { alt_text, bubbles } => json!({
            "type": "flex",
            "altText": alt_text,
            "contents": {
                "type": "carousel",
                "contents": bubbles.iter().map(render_bubble).collect::<Vec<_>>(),
            },
        }),
    }
}

fn render_bubble(bubble: &FacilityBubble) -> Value {
    json!({
        "type": "bubble",
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": [
                { "type": "text", "text": bubble.title, "weight": "bold", "size": "lg", "wrap": true },
                { "type": "text", "text": bubble.address_line, "size": "sm", "color": "#666666", "wrap": true },
                { "type": "text", "text": bubble.phone_line, "size": "sm", "color": "#666666", "wrap": true },
            ],
        },
        "footer": {
            "type": "box",
            "layout": "vertical",
            "contents": [{
                "type": "button",
                "style": "primary",
                "action": {
                    "type": "uri",
                    "label": bubble.map_button_label,
                    "uri": bubble.map_button_uri,
                },
            }],
        },
    })
}
