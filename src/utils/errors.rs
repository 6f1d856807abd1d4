//! Error handling for ChatBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for ChatBuddy application
#[derive(Error, Debug)]
pub enum ChatBuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Dialogue graph errors, raised while loading or validating topic data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogueError {
    #[error("Option '{option}' in '{node}' points to an unknown target")]
    UnknownTarget { node: String, option: String },

    #[error("Duplicate option '{option}' in '{node}'")]
    DuplicateOption { node: String, option: String },

    #[error("Node '{0}' offers no options")]
    NoOptions(String),

    #[error("Node '{0}' has an empty message")]
    EmptyMessage(String),

    #[error("Cold open must offer exactly one '{expected}' option")]
    InvalidColdOpen { expected: String },

    #[error("Invalid external link on '{node}': {url}")]
    InvalidExternalLink { node: String, url: String },

    #[error("Topic id '{0}' is reserved")]
    ReservedTopicId(String),

    #[error("Topic '{0}' is defined more than once")]
    DuplicateTopic(String),
}

/// Result type alias for ChatBuddy operations
pub type Result<T> = std::result::Result<T, ChatBuddyError>;

/// Result type alias for dialogue graph operations
pub type DialogueResult<T> = std::result::Result<T, DialogueError>;

impl ChatBuddyError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ChatBuddyError::Config(_) => false,
            ChatBuddyError::Dialogue(_) => false,
            ChatBuddyError::Telegram(_) => true,
            ChatBuddyError::SessionNotFound(_) => true,
            ChatBuddyError::Serialization(_) => false,
            ChatBuddyError::Io(_) => true,
            ChatBuddyError::UrlParse(_) => false,
            ChatBuddyError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ChatBuddyError::Config(_) => ErrorSeverity::Critical,
            ChatBuddyError::Dialogue(_) => ErrorSeverity::Critical,
            ChatBuddyError::SessionNotFound(_) => ErrorSeverity::Warning,
            ChatBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_error_conversion() {
        let err: ChatBuddyError = DialogueError::NoOptions("pricing".to_string()).into();
        assert_eq!(err.to_string(), "Dialogue error: Node 'pricing' offers no options");
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ChatBuddyError::InvalidInput("x".into()).severity(), ErrorSeverity::Info);
    }
}
