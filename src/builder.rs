//! Builder for configuring and instantiating the chat provider.
//!
//! Provides a fluent interface over the Groq client so callers never have to
//! deal with its long positional constructor.

use crate::{backends::groq::Groq, chat::ChatProvider, error::KellyError};

/// Builder for configuring and instantiating a chat provider.
///
/// # Examples
///
/// ```
/// use kelly::builder::ProviderBuilder;
///
/// let provider = ProviderBuilder::new()
///     .api_key("gsk_example")
///     .temperature(0.7)
///     .max_tokens(1024)
///     .build();
/// assert!(provider.is_ok());
///
/// let err = ProviderBuilder::new().build().err().unwrap();
/// assert!(err.to_string().contains("No API key provided"));
/// ```
#[derive(Default)]
pub struct ProviderBuilder {
    /// API key for authentication with the provider
    api_key: Option<String>,
    /// Base URL for API requests
    base_url: Option<String>,
    /// Model identifier/name to use
    model: Option<String>,
    /// Maximum tokens to generate in responses
    max_tokens: Option<u32>,
    /// Temperature parameter for controlling response randomness
    temperature: Option<f32>,
    /// Top-p (nucleus) sampling parameter
    top_p: Option<f32>,
    /// Stop sequences; `None` sends no stop field at all
    stop: Option<Vec<String>>,
    /// System prompt/context to guide model behavior
    system: Option<String>,
    /// Request timeout duration in seconds
    timeout_seconds: Option<u64>,
}

impl ProviderBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the temperature for controlling response randomness.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the top-p (nucleus) sampling parameter.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the stop sequences.
    pub fn stop(mut self, stop: Option<Vec<String>>) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the system prompt/context.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Builds the configured provider.
    pub fn build(self) -> Result<Box<dyn ChatProvider>, KellyError> {
        let key = self.api_key.ok_or_else(|| {
            KellyError::InvalidRequest("No API key provided for Groq".to_string())
        })?;

        let groq = Groq::with_config(
            key,
            self.base_url,
            self.model,
            self.max_tokens,
            self.temperature,
            self.top_p,
            self.stop,
            self.system,
            self.timeout_seconds,
        )?;
        Ok(Box::new(groq))
    }
}
