use serde::{Deserialize, Serialize};

/// Per-session statistics served by the backend's stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_messages: u32,
    pub user_messages: u32,
    pub ai_messages: u32,
    pub total_characters: u64,
    /// Seconds since the session was created
    pub session_duration: f64,
    /// Last activity (ISO 8601 format)
    pub last_activity: String,
}

impl SessionStats {
    /// Session age rendered as "1h 02m" / "5m" for display.
    pub fn duration_label(&self) -> String {
        let total_minutes = (self.session_duration.max(0.0) / 60.0).floor() as u64;
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        if hours > 0 {
            format!("{}h {:02}m", hours, minutes)
        } else {
            format!("{}m", minutes)
        }
    }
}
