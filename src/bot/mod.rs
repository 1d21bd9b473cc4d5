//! Bot module for handling chat interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles incoming text and non-text messages
//! - `postback_handler`: Handles button taps carrying action tokens
//! - `menu_flow`: Drives the city → district → facility menu
//! - `ui_builder`: Creates quick replies, carousels and text answers
//!
//! Handlers are pure: they compute the [`Reply`] for one event and leave
//! sending it to the transport.

pub mod menu_flow;
pub mod message_handler;
pub mod postback_handler;
pub mod ui_builder;

use tracing::debug;

use crate::catalog::FacilityCatalog;
use crate::localization::Localization;
use crate::query::QueryInterpreter;
use crate::reply::Reply;

// Re-export main handler functions for use by the webhook server
pub use message_handler::{message_handler, unsupported_message_handler};
pub use postback_handler::postback_handler;

/// An inbound chat event that already passed signature verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message { text: String, reply_token: String },
    Postback { data: String, reply_token: String },
    /// A message that is not text (sticker, image, location...)
    UnsupportedMessage { reply_token: String },
    /// The user added the bot as a friend
    Follow { reply_token: String },
}

impl InboundEvent {
    pub fn reply_token(&self) -> &str {
        match self {
            InboundEvent::Message { reply_token, .. }
            | InboundEvent::Postback { reply_token, .. }
            | InboundEvent::UnsupportedMessage { reply_token }
            | InboundEvent::Follow { reply_token } => reply_token,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Message { .. } => "message",
            InboundEvent::Postback { .. } => "postback",
            InboundEvent::UnsupportedMessage { .. } => "unsupported_message",
            InboundEvent::Follow { .. } => "follow",
        }
    }
}

/// Read-only state shared by every request
#[derive(Debug)]
pub struct BotContext {
    catalog: FacilityCatalog,
    interpreter: QueryInterpreter,
    texts: Localization,
}

impl BotContext {
    pub fn new(catalog: FacilityCatalog, interpreter: QueryInterpreter, texts: Localization) -> Self {
        Self {
            catalog,
            interpreter,
            texts,
        }
    }

    pub fn catalog(&self) -> &FacilityCatalog {
        &self.catalog
    }

    pub fn interpreter(&self) -> &QueryInterpreter {
        &self.interpreter
    }

    pub fn texts(&self) -> &Localization {
        &self.texts
    }

    /// Compute the single reply owed to `event`
    pub fn handle_event(&self, event: &InboundEvent) -> Reply {
        debug!(event_kind = event.kind(), reply_token = %event.reply_token(), "Dispatching event");

        match event {
            InboundEvent::Message { text, .. } => message_handler(self, text),
            InboundEvent::Postback { data, .. } => postback_handler(self, data),
            InboundEvent::UnsupportedMessage { .. } => unsupported_message_handler(self),
            InboundEvent::Follow { .. } => ui_builder::root_menu(&self.texts),
        }
    }
}
