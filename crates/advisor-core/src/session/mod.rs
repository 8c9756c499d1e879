//! Session domain module.
//!
//! This module contains the conversation types the backend reports and the
//! trait the remote service is reached through.
//!
//! # Module Structure
//!
//! - `message`: A single transcript entry (`ChatMessage`)
//! - `model`: Sidebar session metadata (`ChatSession`) and its partitioning
//! - `stats`: Per-session statistics (`SessionStats`)
//! - `backend`: The `ChatBackend` trait and its response types
//!
//! # Usage
//!
//! ```ignore
//! use advisor_core::session::{ChatBackend, ChatMessage, ChatSession};
//! ```

mod backend;
mod message;
mod model;
mod stats;

// Re-export public API
pub use backend::{ChatBackend, ChatReply, ChatTranscript, HealthStatus, NewChat, SessionListing};
pub use message::{ChatMessage, display_time};
pub use model::{ChatSession, partition_sessions};
pub use stats::SessionStats;
