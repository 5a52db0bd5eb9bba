//! OpenAI-compatible API client base implementation
//!
//! This module provides a generic base for chat-completions APIs that speak the
//! OpenAI wire format. Groq is the only configuration shipped today, but the
//! transport, request shape and error mapping live here so a backend only has
//! to describe its endpoint.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatProvider, ChatResponse, Usage};
use crate::error::KellyError;

/// Generic OpenAI-compatible provider
///
/// Different providers customize behavior by implementing the
/// `OpenAICompatibleConfig` trait.
pub struct OpenAICompatibleProvider<T: OpenAICompatibleConfig> {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub stop: Option<Vec<String>>,
    pub system: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub client: Client,
    _phantom: PhantomData<T>,
}

/// Configuration trait for OpenAI-compatible providers
pub trait OpenAICompatibleConfig: Send + Sync {
    /// The name of the provider (e.g., "Groq")
    const PROVIDER_NAME: &'static str;

    /// Default base URL for the provider
    const DEFAULT_BASE_URL: &'static str;

    /// Default model for the provider
    const DEFAULT_MODEL: &'static str;

    /// Chat completions endpoint path (usually "chat/completions")
    const CHAT_ENDPOINT: &'static str = "chat/completions";
}

/// Generic OpenAI-compatible chat message
#[derive(Serialize, Debug, PartialEq)]
pub struct OpenAICompatibleChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Generic OpenAI-compatible chat request
#[derive(Serialize, Debug)]
pub struct OpenAICompatibleChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OpenAICompatibleChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a [String]>,
    pub stream: bool,
}

/// Generic OpenAI-compatible chat response
#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatResponse {
    pub choices: Vec<OpenAICompatibleChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatChoice {
    pub message: OpenAICompatibleChatMsg,
}

#[derive(Deserialize, Debug)]
pub struct OpenAICompatibleChatMsg {
    pub role: String,
    pub content: Option<String>,
}

impl ChatResponse for OpenAICompatibleChatResponse {
    fn text(&self) -> Option<String> {
        self.choices.first().and_then(|c| c.message.content.clone())
    }

    fn usage(&self) -> Option<Usage> {
        self.usage.clone()
    }
}

impl std::fmt::Display for OpenAICompatibleChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.choices.first().and_then(|c| c.message.content.as_deref()) {
            Some(content) => write!(f, "{content}"),
            None => Ok(()),
        }
    }
}

impl<T: OpenAICompatibleConfig> OpenAICompatibleProvider<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
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
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }

        let raw_url = base_url.unwrap_or_else(|| T::DEFAULT_BASE_URL.to_owned());
        let base_url = Url::parse(&raw_url).map_err(|e| {
            KellyError::InvalidRequest(format!("Invalid {} base URL {raw_url}: {e}", T::PROVIDER_NAME))
        })?;

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            model: model.unwrap_or_else(|| T::DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            top_p,
            stop,
            system,
            timeout_seconds,
            client: builder.build()?,
            _phantom: PhantomData,
        })
    }

    /// Builds the request body: system prompt first, then `messages` in order.
    pub fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> OpenAICompatibleChatRequest<'a> {
        let mut api_msgs = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = &self.system {
            api_msgs.push(OpenAICompatibleChatMessage {
                role: "system",
                content: system,
            });
        }
        api_msgs.extend(messages.iter().map(|m| OpenAICompatibleChatMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        OpenAICompatibleChatRequest {
            model: &self.model,
            messages: api_msgs,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            stop: self.stop.as_deref(),
            stream: false,
        }
    }

    fn chat_url(&self) -> Result<Url, KellyError> {
        self.base_url
            .join(T::CHAT_ENDPOINT)
            .map_err(|e| KellyError::HttpError(e.to_string()))
    }
}

/// Maps an HTTP status and body to a decoded response or a provider error.
pub fn parse_chat_response(
    provider: &str,
    status: StatusCode,
    body: String,
) -> Result<OpenAICompatibleChatResponse, KellyError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(KellyError::AuthError(format!(
            "{provider} rejected the API key ({status}): {body}"
        )));
    }
    if !status.is_success() {
        return Err(KellyError::ResponseFormatError {
            message: format!("{provider} API returned error status: {status}"),
            raw_response: body,
        });
    }
    serde_json::from_str(&body).map_err(|e| KellyError::ResponseFormatError {
        message: format!("Failed to decode {provider} API response: {e}"),
        raw_response: body,
    })
}

#[async_trait]
impl<T: OpenAICompatibleConfig> ChatProvider for OpenAICompatibleProvider<T> {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, KellyError> {
        if self.api_key.is_empty() {
            return Err(KellyError::AuthError(format!(
                "Missing {} API key",
                T::PROVIDER_NAME
            )));
        }

        let body = self.request_body(messages);
        let url = self.chat_url()?;

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("{} request payload: {}", T::PROVIDER_NAME, json);
            }
        }

        let mut request = self.client.post(url).bearer_auth(&self.api_key).json(&body);
        if let Some(timeout) = self.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                KellyError::Timeout(self.timeout_seconds.unwrap_or_default())
            } else {
                KellyError::from(e)
            }
        })?;

        let status = response.status();
        log::debug!("{} HTTP status: {}", T::PROVIDER_NAME, status);

        let resp_text = response.text().await?;
        let response = parse_chat_response(T::PROVIDER_NAME, status, resp_text)?;
        if let Some(usage) = &response.usage {
            log::debug!(
                "{} usage: prompt={} completion={} total={}",
                T::PROVIDER_NAME,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }
        Ok(Box::new(response))
    }
}
