//! Infrastructure layer for the AdvisorOP client.
//!
//! Concrete adapters for the ports defined in `advisor-core`: the HTTP
//! implementation of `ChatBackend`, the wire DTOs it speaks, and the
//! configuration file service.

pub mod config_service;
pub mod dto;
pub mod http_backend;
pub mod paths;

pub use config_service::ConfigService;
pub use http_backend::HttpChatBackend;
pub use paths::AdvisorPaths;
