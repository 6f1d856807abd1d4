//! Callback query handlers module
//!
//! This module handles the option buttons of the chat keyboard

use std::sync::Arc;
use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::{debug, warn};
use crate::handlers::{session_for, ChatRegistry};
use crate::utils::errors::{ChatBuddyError, Result};
use crate::utils::helpers::parse_option_callback;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    registry: Arc<ChatRegistry>,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query.message.as_ref().map(|m| m.chat().id);

    debug!(user_id = user_id, chat_id = ?chat_id, callback_data = ?query.data, "Processing callback query");

    // Answer first to remove the loading state on the button
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    let Some(option_id) = parse_option_callback(data) else {
        return Err(ChatBuddyError::InvalidInput(format!("unknown callback data '{}'", data)));
    };

    let chat_id = chat_id.unwrap_or(ChatId(user_id));
    let widget = session_for(&bot, &registry, chat_id);

    // A button on an old keyboard brings a closed chat back
    if !widget.is_open() {
        widget.open();
    }

    if widget.select_option(option_id).is_none() {
        debug!(chat_id = chat_id.0, option_id = %option_id, "Option not accepted");
    }

    Ok(())
}
