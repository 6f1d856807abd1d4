//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod start;
pub mod help;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::utils::errors::Result;
use super::ChatRegistry;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "TechKohl chat commands:")]
pub enum Command {
    #[command(description = "Open the chat")]
    Start,
    #[command(description = "Clear the conversation and start over")]
    New,
    #[command(description = "Close the chat")]
    Close,
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    registry: Arc<ChatRegistry>,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, registry).await,
        Command::New => start::handle_new(bot, msg, registry).await,
        Command::Close => start::handle_close(bot, msg, registry).await,
        Command::Help => help::handle_help(bot, msg).await,
    }
}
