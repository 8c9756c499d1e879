//! Conversation message types.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single entry of a conversation transcript.
///
/// `text` may embed inline markup produced by the backend; parse it with
/// [`crate::markup::RichText::parse`] before rendering. `timestamp` is a
/// display string ("HH:MM"), not a canonical instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body, possibly containing inline markup.
    pub text: String,
    /// `true` when the user authored the message.
    pub is_user: bool,
    /// Display-formatted time of the message.
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a user-authored message.
    pub fn user(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            timestamp: timestamp.into(),
        }
    }

    /// Creates an assistant-authored message.
    pub fn assistant(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            timestamp: timestamp.into(),
        }
    }
}

/// Formats an instant the way transcript timestamps are shown: 24-hour "HH:MM".
pub fn display_time(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_constructors_set_author() {
        let user = ChatMessage::user("hello", "09:15");
        let bot = ChatMessage::assistant("<b>hi</b>", "09:16");

        assert!(user.is_user);
        assert!(!bot.is_user);
        assert_eq!(bot.text, "<b>hi</b>");
    }

    #[test]
    fn test_display_time_is_24_hour() {
        let at = Local.with_ymd_and_hms(2025, 8, 3, 21, 5, 0).unwrap();
        assert_eq!(display_time(at), "21:05");
    }

    #[test]
    fn test_wire_shape() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"text":"hey","is_user":true,"timestamp":"10:00"}"#).unwrap();
        assert_eq!(msg, ChatMessage::user("hey", "10:00"));
    }
}
