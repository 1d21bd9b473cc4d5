//! Message Handler module for processing incoming chat messages

use tracing::{debug, info};

use crate::query::Intent;
use crate::reply::Reply;

use super::ui_builder::{format_text_results, help_text, root_menu};
use super::BotContext;

/// Handle a free-text message
pub fn message_handler(ctx: &BotContext, text: &str) -> Reply {
    debug!(message_length = text.len(), "Received text message");

    match ctx.interpreter().interpret(text) {
        Intent::ShowRootMenu => root_menu(ctx.texts()),
        Intent::TextQuery { region } => {
            let records = ctx.catalog().matching_region(&region);
            info!(region = %region, matches = records.len(), "Region query completed");
            format_text_results(ctx.texts(), &region, &records)
        }
        Intent::Unrecognized => help_text(ctx.texts()),
    }
}

/// Stickers, images and other non-text messages get the usage help
pub fn unsupported_message_handler(ctx: &BotContext) -> Reply {
    debug!("Received unsupported message type");
    help_text(ctx.texts())
}
