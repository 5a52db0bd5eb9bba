//! Groq API client implementation for chat functionality.
//!
//! This module provides integration with Groq's hosted models through their
//! OpenAI-compatible API.

use crate::error::KellyError;
use crate::providers::openai_compatible::{OpenAICompatibleConfig, OpenAICompatibleProvider};

/// Environment variable the CLI and live tests read the Groq key from.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Groq configuration for the generic provider
pub struct GroqConfig;

impl OpenAICompatibleConfig for GroqConfig {
    const PROVIDER_NAME: &'static str = "Groq";
    const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1/";
    const DEFAULT_MODEL: &'static str = crate::persona::MODEL;
}

pub type Groq = OpenAICompatibleProvider<GroqConfig>;

impl Groq {
    /// Creates a new Groq client with the specified configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        top_p: Option<f32>,
        stop: Option<Vec<String>>,
        system: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, KellyError> {
        OpenAICompatibleProvider::<GroqConfig>::new(
            api_key,
            base_url,
            model,
            max_tokens,
            temperature,
            top_p,
            stop,
            system,
            timeout_seconds,
        )
    }
}
