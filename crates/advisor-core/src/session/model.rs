//! Session metadata as listed in the sidebar.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// A server-tracked conversation thread, as reported by the session listing.
///
/// The backend is authoritative for every field. The client patches
/// `is_archived` and `title` locally; `message_count` is only refreshed by a
/// full reload of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier assigned by the backend
    pub session_key: String,
    /// Human-readable session title
    pub title: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    /// Archived sessions are listed separately
    #[serde(default)]
    pub is_archived: bool,
    /// Number of messages at the time of the last listing
    #[serde(default)]
    pub message_count: u32,
}

impl ChatSession {
    /// Parses `updated_at`.
    ///
    /// Accepts RFC 3339 and offset-less ISO 8601 (treated as UTC).
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_iso8601(&self.updated_at)
    }

    /// Relative label for the last activity: "Today", "Yesterday",
    /// "N days ago" within a week, else the local calendar date.
    pub fn updated_label(&self, now: DateTime<Local>) -> String {
        let Some(updated) = self.updated_at_utc() else {
            return self.updated_at.clone();
        };
        let elapsed_ms = (now.with_timezone(&Utc) - updated).num_milliseconds().abs() as f64;
        let days = (elapsed_ms / MILLIS_PER_DAY).ceil() as i64;

        match days {
            d if d <= 1 => "Today".to_string(),
            2 => "Yesterday".to_string(),
            d if d <= 7 => format!("{} days ago", d - 1),
            _ => updated.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        }
    }
}

fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Splits sessions into `(active, archived)` by `is_archived`, keeping order.
///
/// Every session lands in exactly one of the two lists.
pub fn partition_sessions(sessions: &[ChatSession]) -> (Vec<ChatSession>, Vec<ChatSession>) {
    sessions.iter().cloned().partition(|s| !s.is_archived)
}
