//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub webhook_url: Option<String>,
}

/// Chat widget configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Dialogue JSON file; the embedded dialogue is used when unset
    pub dialogue_path: Option<String>,
    /// Typing delay before the first bot message of a turn
    pub typing_delay_ms: u64,
    /// Typing delay before a follow-up message
    pub follow_up_delay_ms: u64,
    /// Pause between the last bot message and the options reveal
    pub options_delay_ms: u64,
    /// Delay before the launcher button appears after mount
    pub launcher_delay_ms: u64,
    /// Length of the closing animation
    pub close_animation_ms: u64,
    /// chrono format for message timestamps
    pub time_format: String,
    /// chrono format for the conversation date chip
    pub date_format: String,
    /// Capacity of the widget event channel
    pub event_buffer: usize,
    /// Closed sessions quiet for this long are dropped by the host
    pub session_idle_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    /// Rotated daily log files kept on disk
    pub max_files: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CHATBUDDY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ChatBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl ChatConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }

    pub fn options_delay(&self) -> Duration {
        Duration::from_millis(self.options_delay_ms)
    }

    pub fn launcher_delay(&self) -> Duration {
        Duration::from_millis(self.launcher_delay_ms)
    }

    pub fn close_animation(&self) -> Duration {
        Duration::from_millis(self.close_animation_ms)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            dialogue_path: None,
            typing_delay_ms: 1150,
            follow_up_delay_ms: 700,
            options_delay_ms: 320,
            launcher_delay_ms: 2800,
            close_animation_ms: 195,
            time_format: "%I:%M %p".to_string(),
            date_format: "%-d %b %Y".to_string(),
            event_buffer: 64,
            session_idle_secs: 1800,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                webhook_url: None,
            },
            chat: ChatConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
                max_files: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chat_timings() {
        let chat = ChatConfig::default();
        assert_eq!(chat.typing_delay(), Duration::from_millis(1150));
        assert_eq!(chat.follow_up_delay(), Duration::from_millis(700));
        assert_eq!(chat.options_delay(), Duration::from_millis(320));
        assert_eq!(chat.session_idle(), Duration::from_secs(1800));
        assert!(chat.dialogue_path.is_none());
    }

    #[test]
    fn test_partial_chat_section_uses_defaults() {
        let chat: ChatConfig = serde_json::from_str(r#"{"typing_delay_ms": 10}"#).unwrap();
        assert_eq!(chat.typing_delay_ms, 10);
        assert_eq!(chat.follow_up_delay_ms, 700);
        assert_eq!(chat.event_buffer, 64);
    }
}
