//! Kelly is a terminal chat client that answers questions about artificial
//! intelligence in skeptical, analytical verse.
//!
//! # Overview
//! Every question is sent on its own to a hosted chat-completion API (Groq)
//! together with a fixed persona prompt. Replies are shown as they arrive and
//! kept in an in-memory transcript until the session ends.
//!
//! # Architecture
//! - [`session`] owns the transcript and credential and drives each turn
//! - [`providers`] and [`backends`] speak the OpenAI-compatible wire format
//! - [`persona`] holds the prompt and sampling parameters
//! - [`render`] prints the conversation (with the `cli` feature)

// Re-export for convenience
pub use async_trait::async_trait;

/// Backend configurations for supported providers
pub mod backends;

/// Builder pattern for configuring and instantiating providers
pub mod builder;

/// Chat messages and the provider trait
pub mod chat;

/// Error types and handling
pub mod error;

/// Kelly's system prompt, sampling parameters and UI copy
pub mod persona;

/// Shared client code for OpenAI-compatible APIs
pub mod providers;

/// Session state and the chat controller
pub mod session;

#[cfg(feature = "cli")]
pub mod render;

pub use chat::{ChatMessage, ChatRole};
pub use error::KellyError;
pub use session::{ChatSession, Credential, SessionConfig, Transcript};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
