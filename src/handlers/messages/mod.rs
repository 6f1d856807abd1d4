//! Message handlers module
//!
//! The conversation is driven by buttons only; free text gets a pointer back
//! to the keyboard

use teloxide::{Bot, types::Message, prelude::*};
use tracing::debug;
use crate::utils::errors::Result;
use crate::utils::helpers::truncate_text;

/// Handle incoming text messages
pub async fn handle_message(bot: Bot, msg: Message) -> Result<()> {
    let chat_id = msg.chat.id;

    if let Some(text) = msg.text() {
        debug!(chat_id = chat_id.0, text = %truncate_text(text, 64), "Free text message received");
    }

    bot.send_message(
        chat_id,
        "I can only answer through the buttons. Send /start to open the chat or /help for the commands.",
    )
    .await?;
    Ok(())
}
