//! Application layer for AdvisorOP.
//!
//! This crate holds the client-side state of a chat: the tracked session key,
//! the message transcript, the session list, and the controller that keeps
//! them consistent for a renderer.

pub mod chat_client;
pub mod controller;
pub mod message_store;
pub mod session_store;
pub mod session_tracker;

#[cfg(test)]
mod controller_test;
#[cfg(test)]
mod test_support;

pub use chat_client::ChatClient;
pub use controller::{ChatController, ChatViewState};
pub use message_store::{MessageState, MessageStore, SendOutcome};
pub use session_store::{SessionListState, SessionListStore};
pub use session_tracker::SessionTracker;
