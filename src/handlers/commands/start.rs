//! Start command handler
//!
//! Handles /start, /new and /close: opening, resetting and hiding the chat

use std::sync::Arc;
use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, info};
use crate::handlers::{session_for, ChatRegistry};
use crate::utils::errors::{ChatBuddyError, Result};

/// Handle /start command - open the chat widget for this chat
pub async fn handle_start(bot: Bot, msg: Message, registry: Arc<ChatRegistry>) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, "Processing /start command");

    let widget = session_for(&bot, &registry, chat_id);
    if widget.is_open() {
        bot.send_message(
            chat_id,
            "The chat is already open. Pick an option above or send /new to start over.",
        )
        .await?;
        return Ok(());
    }

    widget.open();
    info!(chat_id = chat_id.0, "Chat opened");
    Ok(())
}

/// Handle /new command - discard the conversation and offer the cold open
pub async fn handle_new(bot: Bot, msg: Message, registry: Arc<ChatRegistry>) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, "Processing /new command");

    let widget = session_for(&bot, &registry, chat_id);
    widget.reset();
    if !widget.is_open() {
        widget.open();
    }
    Ok(())
}

/// Handle /close command - hide the chat, keeping the conversation
pub async fn handle_close(bot: Bot, msg: Message, registry: Arc<ChatRegistry>) -> Result<()> {
    let chat_id = msg.chat.id;
    debug!(chat_id = chat_id.0, "Processing /close command");

    let widget = match registry.require(&chat_id.0) {
        Ok(widget) => widget,
        Err(ChatBuddyError::SessionNotFound(_)) => {
            bot.send_message(chat_id, "There is no open chat. Send /start to begin.").await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if widget.close().is_none() {
        bot.send_message(chat_id, "The chat is already closed. Send /start to reopen it.").await?;
    }
    Ok(())
}
