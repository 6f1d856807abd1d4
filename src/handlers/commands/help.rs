//! Help command handler

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let help_text = "🤖 TechKohl Assistant Help\n\n\
        /start - Open the chat\n\
        /new - Clear the conversation and start over\n\
        /close - Close the chat\n\
        /help - Show this help message\n\n\
        Tap the buttons under a message to pick a topic.";

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}
