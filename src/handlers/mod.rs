//! Bot handlers module
//!
//! This module contains the Telegram host for the chat widget:
//! - Command handlers for bot commands
//! - Callback handlers for option buttons
//! - Message handlers for free text
//! - The renderer that turns widget events into Telegram messages

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod render;

use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use teloxide::types::ChatId;
use tokio::task::JoinHandle;
use crate::state::{ChatWidget, SessionRegistry};

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;
pub use render::{options_keyboard, spawn_renderer, TelegramNavigator};

/// Widgets keyed by Telegram chat id
pub type ChatRegistry = SessionRegistry<i64>;

/// Upper bound on how often idle sessions are swept
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Widget for a chat, spawning its renderer when the widget is new
pub fn session_for(bot: &Bot, registry: &ChatRegistry, chat_id: ChatId) -> ChatWidget {
    let (widget, created) = registry.get_or_create(&chat_id.0);
    if created {
        spawn_renderer(bot.clone(), chat_id, &widget);
    }
    widget
}

/// Periodically evict closed chats that have been quiet for `idle`
///
/// Evicting a chat drops its widget, which in turn stops its renderer.
pub fn spawn_session_sweeper(registry: Arc<ChatRegistry>, idle: Duration) -> JoinHandle<()> {
    let period = idle.clamp(Duration::from_secs(1), SWEEP_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            registry.evict_idle(idle);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;
    use crate::dialogue::DialogueGraph;
    use crate::state::{ConversationEngine, LogNavigator, Navigator, Timing};

    fn registry() -> Arc<ChatRegistry> {
        let graph = Arc::new(DialogueGraph::embedded().unwrap());
        let engine = ConversationEngine::new(graph, Timing::default());
        Arc::new(ChatRegistry::new(engine, ChatConfig::default(), Arc::new(|_: &i64| {
            Arc::new(LogNavigator) as Arc<dyn Navigator>
        })))
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_closed_chats() {
        let registry = registry();
        registry.get_or_create(&10);
        let (open, _) = registry.get_or_create(&11);
        open.open();

        let sweeper = spawn_session_sweeper(Arc::clone(&registry), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(10)).await;
        sweeper.abort();

        assert!(registry.get(&10).is_none());
        assert!(registry.get(&11).is_some());
    }
}
