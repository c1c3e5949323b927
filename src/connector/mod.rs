//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - Model services (Gemini, Anthropic-compatible, offline mock)
//! - Webhook delivery (HTTPS with optional pinned CA, mock)
//! - The CLI surface (container, router, controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
