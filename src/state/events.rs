//! Widget events, broadcast from a ChatWidget to its host via tokio::broadcast.

use serde::Serialize;
use url::Url;

use crate::dialogue::OptionLink;
use super::session::{ChatMessage, Visibility};

/// Events published to every subscriber of a widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum WidgetEvent {
    #[serde(rename = "user_message")]
    UserMessage(ChatMessage),

    /// Typing indicator switched on
    #[serde(rename = "typing")]
    Typing,

    /// Typing finished and a bot message was appended
    #[serde(rename = "bot_message")]
    BotMessage(ChatMessage),

    #[serde(rename = "options_hidden")]
    OptionsHidden,

    #[serde(rename = "options_revealed")]
    OptionsRevealed(Vec<OptionLink>),

    #[serde(rename = "navigated")]
    Navigated(Url),

    /// Session discarded; the cold open is offered again
    #[serde(rename = "reset")]
    Reset,

    #[serde(rename = "visibility")]
    Visibility(Visibility),

    #[serde(rename = "unread")]
    Unread(bool),

    #[serde(rename = "launcher_shown")]
    LauncherShown,
}

impl WidgetEvent {
    /// Serialize to `{"event": "...", "data": {...}}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
