//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

/// Prefix for option callback data sent through inline keyboards
pub const OPTION_CALLBACK_PREFIX: &str = "opt:";

/// Generate a new UUID v4
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Format a message timestamp in local time using a chrono format string
pub fn format_message_time(timestamp: DateTime<Utc>, format: &str) -> String {
    timestamp.with_timezone(&Local).format(format).to_string()
}

/// Format the date chip shown above a conversation
pub fn format_date_label(timestamp: DateTime<Utc>, format: &str) -> String {
    format_message_time(timestamp, format)
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape the characters Telegram HTML parse mode treats as markup
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build inline keyboard callback data for an option id
pub fn option_callback_data(option_id: &str) -> String {
    format!("{}{}", OPTION_CALLBACK_PREFIX, option_id)
}

/// Extract the option id from inline keyboard callback data
pub fn parse_option_callback(data: &str) -> Option<&str> {
    data.strip_prefix(OPTION_CALLBACK_PREFIX)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer piece of text", 10), "a longe...");
        assert_eq!(truncate_text("🛠️🛠️🛠️🛠️🛠️🛠️", 4), "🛠...");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_option_callback_round_trip() {
        let data = option_callback_data("pricing");
        assert_eq!(data, "opt:pricing");
        assert_eq!(parse_option_callback(&data), Some("pricing"));
        assert_eq!(parse_option_callback("opt:"), None);
        assert_eq!(parse_option_callback("lang:en"), None);
    }

    #[test]
    fn test_format_message_time() {
        let ts = DateTime::parse_from_rfc3339("2024-03-05T10:07:42Z")
            .unwrap()
            .with_timezone(&Utc);
        let formatted = format_message_time(ts, "%S");
        assert_eq!(formatted, "42");
    }

    #[test]
    fn test_format_date_label_matches_message_time() {
        let ts = DateTime::parse_from_rfc3339("2024-03-05T10:07:42Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date_label(ts, "%S"), "42");
        assert_eq!(format_date_label(ts, "%b %Y"), format_message_time(ts, "%b %Y"));
    }
}
