//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ChatBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_chat_config(&settings.chat)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(ChatBuddyError::Config(
            "Bot token is required".to_string()
        ));
    }

    if let Some(ref webhook_url) = config.webhook_url {
        url::Url::parse(webhook_url)?;
    }

    Ok(())
}

/// Validate chat widget configuration
fn validate_chat_config(config: &super::ChatConfig) -> Result<()> {
    if config.typing_delay_ms == 0 {
        return Err(ChatBuddyError::Config(
            "Typing delay must be greater than 0".to_string()
        ));
    }

    if config.follow_up_delay_ms == 0 {
        return Err(ChatBuddyError::Config(
            "Follow-up delay must be greater than 0".to_string()
        ));
    }

    if config.options_delay_ms == 0 {
        return Err(ChatBuddyError::Config(
            "Options delay must be greater than 0".to_string()
        ));
    }

    if config.time_format.trim().is_empty() {
        return Err(ChatBuddyError::Config(
            "Message time format is required".to_string()
        ));
    }

    if config.date_format.trim().is_empty() {
        return Err(ChatBuddyError::Config(
            "Date label format is required".to_string()
        ));
    }

    if config.event_buffer == 0 {
        return Err(ChatBuddyError::Config(
            "Event buffer must be greater than 0".to_string()
        ));
    }

    if config.session_idle_secs == 0 {
        return Err(ChatBuddyError::Config(
            "Session idle timeout must be greater than 0".to_string()
        ));
    }

    if let Some(ref path) = config.dialogue_path {
        if path.trim().is_empty() {
            return Err(ChatBuddyError::Config(
                "Dialogue path cannot be blank".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ChatBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ChatBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
