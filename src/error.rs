use std::fmt;

/// How loudly a failed submission should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing was sent; the user only has to fix their setup
    Warning,
    /// The request was attempted (or rejected) and produced no reply
    Error,
}

/// Error types that can occur while talking to Kelly.
#[derive(Debug)]
pub enum KellyError {
    /// A question was submitted before any API key was entered
    MissingCredential,
    /// HTTP request/response errors
    HttpError(String),
    /// Authentication and authorization errors
    AuthError(String),
    /// Invalid request parameters or format
    InvalidRequest(String),
    /// Errors returned by the provider
    ProviderError(String),
    /// API response parsing or format error
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    JsonError(String),
    /// The provider did not answer within the configured number of seconds
    Timeout(u64),
    /// The user interrupted the request while it was in flight
    Cancelled,
    /// The call succeeded but carried no usable text
    EmptyResponse,
}

impl KellyError {
    pub fn severity(&self) -> Severity {
        match self {
            KellyError::MissingCredential => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether the failure came back from the provider rather than from the
    /// session itself.
    pub fn from_provider(&self) -> bool {
        !matches!(
            self,
            KellyError::MissingCredential | KellyError::InvalidRequest(_) | KellyError::Cancelled
        )
    }

    /// Whether the question that triggered this error stays in the transcript.
    ///
    /// Requests that never left the controller are rolled back; anything that
    /// reached the provider keeps the question so the user can resend it.
    pub fn keeps_question(&self) -> bool {
        !matches!(
            self,
            KellyError::MissingCredential | KellyError::InvalidRequest(_)
        )
    }
}

impl fmt::Display for KellyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KellyError::MissingCredential => write!(
                f,
                "Please enter your Groq API key to get a response"
            ),
            KellyError::HttpError(e) => write!(f, "HTTP Error: {e}"),
            KellyError::AuthError(e) => write!(f, "Auth Error: {e}"),
            KellyError::InvalidRequest(e) => write!(f, "Invalid Request: {e}"),
            KellyError::ProviderError(e) => write!(f, "Provider Error: {e}"),
            KellyError::ResponseFormatError {
                message,
                raw_response,
            } => write!(
                f,
                "Response Format Error: {message}. Raw response: {raw_response}"
            ),
            KellyError::JsonError(e) => write!(f, "JSON Parse Error: {e}"),
            KellyError::Timeout(secs) => {
                write!(f, "Timeout: no answer from the provider after {secs}s")
            }
            KellyError::Cancelled => write!(f, "Request cancelled"),
            KellyError::EmptyResponse => write!(f, "The provider returned no text"),
        }
    }
}

impl std::error::Error for KellyError {}

/// Converts reqwest HTTP errors into KellyErrors
impl From<reqwest::Error> for KellyError {
    fn from(err: reqwest::Error) -> Self {
        KellyError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for KellyError {
    fn from(err: serde_json::Error) -> Self {
        KellyError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_is_only_a_warning() {
        assert_eq!(KellyError::MissingCredential.severity(), Severity::Warning);
        assert_eq!(KellyError::EmptyResponse.severity(), Severity::Error);
        assert_eq!(KellyError::Timeout(5).severity(), Severity::Error);
    }

    #[test]
    fn provider_failures_keep_the_question() {
        assert!(!KellyError::MissingCredential.keeps_question());
        assert!(!KellyError::InvalidRequest("empty".into()).keeps_question());
        assert!(KellyError::HttpError("reset".into()).keeps_question());
        assert!(KellyError::EmptyResponse.keeps_question());
        assert!(KellyError::Cancelled.keeps_question());
    }

    #[test]
    fn only_provider_failures_are_attributed_to_the_provider() {
        assert!(KellyError::HttpError("reset".into()).from_provider());
        assert!(KellyError::Timeout(60).from_provider());
        assert!(KellyError::EmptyResponse.from_provider());
        assert!(!KellyError::Cancelled.from_provider());
        assert!(!KellyError::InvalidRequest("empty".into()).from_provider());
        assert!(!KellyError::MissingCredential.from_provider());
    }

    #[test]
    fn display_carries_underlying_message() {
        let err = KellyError::ResponseFormatError {
            message: "Groq API returned error status: 429".into(),
            raw_response: "rate limited".into(),
        };
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
    }
}
