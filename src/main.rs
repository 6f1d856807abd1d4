//! ChatBuddy Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::{ChatId, Update}};
use teloxide::dispatching::UpdateHandler;
use tracing::{info, warn, error};

use ChatBuddy::{
    config::Settings,
    dialogue::DialogueGraph,
    utils::logging,
    state::{ConversationEngine, Navigator, Timing},
    handlers::{
        ChatRegistry, Command, TelegramNavigator, spawn_session_sweeper,
        handle_command, handle_callback_query, handle_message,
    },
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading configuration
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on shutdown
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ChatBuddy::info());

    // Load the dialogue
    info!("Loading dialogue...");
    let graph = Arc::new(DialogueGraph::from_config(&settings.chat).await?);
    let engine = ConversationEngine::new(graph, Timing::from_config(&settings.chat));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // One widget per chat, each navigating through its own chat
    let navigator_bot = bot.clone();
    let registry = Arc::new(ChatRegistry::new(
        engine,
        settings.chat.clone(),
        Arc::new(move |chat_id: &i64| {
            Arc::new(TelegramNavigator::new(navigator_bot.clone(), ChatId(*chat_id))) as Arc<dyn Navigator>
        }),
    ));

    // Closed chats that stay quiet are dropped along with their renderers
    spawn_session_sweeper(Arc::clone(&registry), settings.chat.session_idle());

    info!("Setting up bot handlers...");

    // Create the handler
    let handler = create_handler();

    // Create dispatcher with dependencies registered
    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![registry])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook_url) = &settings.bot.webhook_url {
        info!("Webhook URL configured: {}", webhook_url);
        info!("Note: Webhook setup not implemented in this version, falling back to polling");
    }

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("ChatBuddy bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle regular messages
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle option buttons
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    registry: Arc<ChatRegistry>,
) -> HandlerResult {
    let chat_id = msg.chat.id;

    if let Err(e) = handle_command(bot, msg, cmd.clone(), registry).await {
        error!(chat_id = chat_id.0, command = ?cmd, severity = %e.severity(), error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(bot: Bot, msg: Message) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    registry: Arc<ChatRegistry>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, registry).await {
        if e.is_recoverable() {
            warn!(user_id = user_id, error = %e, "Callback query not handled");
            return Ok(());
        }
        error!(user_id = user_id, severity = %e.severity(), error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
