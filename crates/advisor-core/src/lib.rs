//! Domain layer of the AdvisorOP chat client.
//!
//! Holds the types shared by every other crate: messages and sessions as the
//! backend reports them, the [`session::ChatBackend`] trait the remote service
//! is reached through, the trusted rich-text model used by renderers, and the
//! client configuration.

pub mod config;
pub mod error;
pub mod markup;
pub mod session;

// Re-export common error type
pub use error::AdvisorError;
