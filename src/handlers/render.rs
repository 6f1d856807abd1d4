//! Telegram rendering of widget events
//!
//! Each chat gets a renderer task subscribed to its widget. Events map onto
//! Telegram calls: typing becomes a chat action, bot messages become HTML
//! messages and the offered options become an inline keyboard.

use chrono::Utc;
use teloxide::{Bot, prelude::*};
use teloxide::types::{ChatAction, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::ChatConfig;
use crate::dialogue::{OptionLink, RichText};
use crate::state::{ChatWidget, Navigator, Visibility, WidgetEvent};
use crate::utils::errors::Result;
use crate::utils::helpers::{escape_html, format_date_label, option_callback_data};
use crate::utils::logging::log_api_error;

const HEADER_TITLE: &str = "💬 TechKohl Assistant";
const OPTIONS_PROMPT: &str = "Choose an option:";

/// Build the inline keyboard for an option set, one button per row
pub fn options_keyboard(options: &[OptionLink]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(options.iter().map(|option| {
        vec![InlineKeyboardButton::callback(
            option.label.clone(),
            option_callback_data(&option.id),
        )]
    }))
}

/// Spawn the renderer task for a chat
///
/// Subscribes before spawning so no event published after this call is lost.
/// The task ends once every handle to the widget is dropped, which happens
/// after the registry evicts an idle session.
pub fn spawn_renderer(bot: Bot, chat_id: ChatId, widget: &ChatWidget) -> JoinHandle<()> {
    let mut events = widget.subscribe();
    let mut view = ChatView::new(chat_id, widget.config(), widget.snapshot().options);

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(e) = view.render(&bot, event).await {
                        log_api_error("telegram", &e.to_string(), Some("render widget event"));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(chat_id = chat_id.0, skipped = skipped, "Renderer lagged behind widget events");
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!(chat_id = chat_id.0, "Renderer stopped");
    })
}

/// What this chat currently shows
struct ChatView {
    chat_id: ChatId,
    time_format: String,
    date_format: String,
    /// Options offered by the widget, if the bot is not mid-turn
    offered: Vec<OptionLink>,
    /// Message carrying the live keyboard and the options on it
    keyboard: Option<(MessageId, Vec<OptionLink>)>,
}

impl ChatView {
    fn new(chat_id: ChatId, config: &ChatConfig, offered: Vec<OptionLink>) -> Self {
        Self {
            chat_id,
            time_format: config.time_format.clone(),
            date_format: config.date_format.clone(),
            offered,
            keyboard: None,
        }
    }

    async fn render(&mut self, bot: &Bot, event: WidgetEvent) -> Result<()> {
        match event {
            WidgetEvent::UserMessage(message) => {
                let text = format!("› <i>{}</i>", escape_html(&message.text));
                bot.send_message(self.chat_id, text)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            WidgetEvent::Typing => {
                bot.send_chat_action(self.chat_id, ChatAction::Typing).await?;
            }
            WidgetEvent::BotMessage(message) => {
                let html = format!(
                    "{}\n<i>{}</i>",
                    RichText::parse(&message.text).to_html(),
                    escape_html(&message.time_label(&self.time_format))
                );
                bot.send_message(self.chat_id, html)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            WidgetEvent::OptionsHidden => {
                self.offered.clear();
                self.remove_keyboard(bot).await?;
            }
            WidgetEvent::OptionsRevealed(options) => {
                self.offered = options;
                self.show_keyboard(bot).await?;
            }
            WidgetEvent::Reset => {
                self.offered.clear();
                self.remove_keyboard(bot).await?;
                bot.send_message(self.chat_id, "🔄 Conversation cleared.").await?;
            }
            WidgetEvent::Visibility(Visibility::Open) => {
                let header = format!(
                    "<b>{}</b>\n{}",
                    HEADER_TITLE,
                    escape_html(&format_date_label(Utc::now(), &self.date_format))
                );
                bot.send_message(self.chat_id, header)
                    .parse_mode(ParseMode::Html)
                    .await?;
                self.show_keyboard(bot).await?;
            }
            WidgetEvent::Visibility(Visibility::Closed) => {
                self.remove_keyboard(bot).await?;
                bot.send_message(self.chat_id, "Chat closed. Send /start to reopen it.").await?;
            }
            WidgetEvent::Visibility(Visibility::Closing) => {}
            WidgetEvent::Navigated(url) => {
                debug!(chat_id = self.chat_id.0, url = %url, "Navigation rendered by navigator");
            }
            WidgetEvent::Unread(unread) => {
                debug!(chat_id = self.chat_id.0, unread = unread, "Unread state changed");
            }
            WidgetEvent::LauncherShown => {}
        }
        Ok(())
    }

    /// Send the offered options unless the same keyboard is already live
    async fn show_keyboard(&mut self, bot: &Bot) -> Result<()> {
        if self.offered.is_empty() {
            return Ok(());
        }
        if let Some((_, live)) = &self.keyboard {
            if *live == self.offered {
                return Ok(());
            }
        }

        self.remove_keyboard(bot).await?;
        let sent = bot
            .send_message(self.chat_id, OPTIONS_PROMPT)
            .reply_markup(options_keyboard(&self.offered))
            .await?;
        self.keyboard = Some((sent.id, self.offered.clone()));
        Ok(())
    }

    async fn remove_keyboard(&mut self, bot: &Bot) -> Result<()> {
        if let Some((message_id, _)) = self.keyboard.take() {
            bot.edit_message_reply_markup(self.chat_id, message_id).await?;
        }
        Ok(())
    }
}

/// Navigator that sends the link as a URL button into the chat
pub struct TelegramNavigator {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNavigator {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

impl Navigator for TelegramNavigator {
    fn open_in_new_context(&self, url: &Url) {
        let bot = self.bot.clone();
        let chat_id = self.chat_id;
        let url = url.clone();

        tokio::spawn(async move {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![
                InlineKeyboardButton::url("🌐 Open in browser", url.clone()),
            ]]);
            let text = format!("Opening {}", url);
            if let Err(e) = bot.send_message(chat_id, text).reply_markup(keyboard).await {
                log_api_error("telegram", &e.to_string(), Some("send navigation link"));
            }
        });
    }
}
