//! Postback Handler module for processing button taps

use tracing::{debug, warn};

use crate::menu_action::MenuAction;
use crate::reply::Reply;

use super::menu_flow::handle_action;
use super::ui_builder::fallback_text;
use super::BotContext;

/// Handle the action token echoed back by a tapped button.
///
/// A token that cannot be decoded still gets an answer: the generic
/// fallback text.
pub fn postback_handler(ctx: &BotContext, data: &str) -> Reply {
    match MenuAction::parse(data) {
        Ok(action) => {
            debug!(action = ?action, "Received postback");
            handle_action(ctx, &action)
        }
        Err(e) => {
            warn!(error = %e, data = %data, "Malformed action token");
            fallback_text(ctx.texts())
        }
    }
}
