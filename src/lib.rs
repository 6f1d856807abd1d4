//! ChatBuddy Telegram Bot
//!
//! A scripted sales-assistant chat for the TechKohl agency. The library holds
//! the dialogue graph, the conversation engine that walks it, the widget that
//! plays turns out on a timer and a Telegram host that renders it all.

#![allow(non_snake_case)]

pub mod config;
pub mod dialogue;
pub mod handlers;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ChatBuddyError, DialogueError, Result};

// Re-export main components for easy access
pub use dialogue::DialogueGraph;
pub use state::{ChatWidget, ConversationEngine, SessionRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
