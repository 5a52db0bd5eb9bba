//! Chat session state and the controller that drives one question/answer turn.
//!
//! A [`ChatSession`] owns everything that lives for the duration of one
//! conversation: the [`Transcript`], the optional [`Credential`] and the
//! [`ReplyGenerator`] that talks to the provider. Nothing here is global and
//! nothing is written to disk; dropping the session ends it.

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::backends::groq::GroqConfig;
use crate::builder::ProviderBuilder;
use crate::chat::{ChatMessage, ChatProvider};
use crate::error::KellyError;
use crate::persona;
use crate::providers::openai_compatible::OpenAICompatibleConfig;

/// Default number of seconds a single reply may take.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// The API key the user supplied for this session.
///
/// Held in memory only. `Debug` never prints the secret.
pub struct Credential(SecretString);

impl Credential {
    /// Wraps `key`, or returns `None` when it is blank.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(key.to_string())))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Ordered history of the messages exchanged in one session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Tentatively appends `question` and returns the turn that must settle it.
    pub fn begin(&mut self, question: ChatMessage) -> PendingTurn<'_> {
        let index = self.messages.len();
        self.messages.push(question);
        PendingTurn {
            transcript: self,
            index,
        }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// A user message that has been appended but not yet answered.
///
/// Settling consumes the turn. A turn dropped without being settled behaves
/// like [`PendingTurn::fail`]: the question stays, no reply is added.
#[must_use = "a pending turn should be committed, failed or reverted"]
pub struct PendingTurn<'a> {
    transcript: &'a mut Transcript,
    index: usize,
}

impl PendingTurn<'_> {
    pub fn question(&self) -> &ChatMessage {
        &self.transcript.messages[self.index]
    }

    /// Appends the assistant's reply right after the question.
    pub fn commit(self, reply: ChatMessage) {
        debug_assert_eq!(self.transcript.messages.len(), self.index + 1);
        self.transcript.messages.push(reply);
    }

    /// Keeps the question without a reply so the user can resend it.
    pub fn fail(self) {}

    /// Removes the question as if it had never been submitted.
    pub fn revert(self) {
        self.transcript.messages.truncate(self.index);
    }
}

/// Creates a provider bound to one credential.
///
/// A fresh provider is built for every request, so a key entered mid-session
/// takes effect on the next question.
pub trait ProviderFactory: Send + Sync {
    fn connect(
        &self,
        credential: &Credential,
        system_prompt: &str,
    ) -> Result<Box<dyn ChatProvider>, KellyError>;
}

/// Runtime settings an operator may change from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: persona::MODEL.to_string(),
            base_url: GroqConfig::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Builds Groq providers with Kelly's fixed sampling parameters.
pub struct GroqFactory {
    config: SessionConfig,
}

impl GroqFactory {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl ProviderFactory for GroqFactory {
    fn connect(
        &self,
        credential: &Credential,
        system_prompt: &str,
    ) -> Result<Box<dyn ChatProvider>, KellyError> {
        ProviderBuilder::new()
            .api_key(credential.expose())
            .base_url(self.config.base_url.clone())
            .model(self.config.model.clone())
            .system(system_prompt)
            .temperature(persona::TEMPERATURE)
            .top_p(persona::TOP_P)
            .max_tokens(persona::MAX_TOKENS)
            .stop(persona::stop_sequences())
            .timeout_seconds(self.config.timeout_seconds)
            .build()
    }
}

/// Turns one question into Kelly's reply.
pub struct ReplyGenerator {
    factory: Box<dyn ProviderFactory>,
    timeout_seconds: u64,
}

impl ReplyGenerator {
    pub fn new(factory: Box<dyn ProviderFactory>, timeout_seconds: u64) -> Self {
        Self {
            factory,
            timeout_seconds,
        }
    }

    /// Sends the persona prompt and `question`, and nothing else, to the
    /// provider and returns the first choice's text untouched.
    pub async fn generate_reply(
        &self,
        credential: &Credential,
        question: &str,
    ) -> Result<String, KellyError> {
        let provider = self.factory.connect(credential, persona::SYSTEM_PROMPT)?;
        let messages = [ChatMessage::user().content(question).build()];

        let response = tokio::time::timeout(
            Duration::from_secs(self.timeout_seconds),
            provider.chat(&messages),
        )
        .await
        .map_err(|_| KellyError::Timeout(self.timeout_seconds))??;

        match response.text() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(KellyError::EmptyResponse),
        }
    }
}

/// The chat session controller.
pub struct ChatSession {
    transcript: Transcript,
    credential: Option<Credential>,
    generator: ReplyGenerator,
}

impl ChatSession {
    /// Starts a session with an empty transcript and no credential.
    pub fn new(factory: Box<dyn ProviderFactory>, timeout_seconds: u64) -> Self {
        Self {
            transcript: Transcript::new(),
            credential: None,
            generator: ReplyGenerator::new(factory, timeout_seconds),
        }
    }

    /// Starts a session that talks to Groq.
    pub fn groq(config: SessionConfig) -> Self {
        let timeout = config.timeout_seconds;
        Self::new(Box::new(GroqFactory::new(config)), timeout)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    pub fn clear_credential(&mut self) {
        self.credential = None;
    }

    /// Submits a question and, on success, returns Kelly's reply.
    ///
    /// The question is appended before anything else happens. Without a
    /// credential it is removed again and [`KellyError::MissingCredential`] is
    /// returned. If the provider fails the question stays in the transcript
    /// with no reply after it.
    pub async fn submit(&mut self, question: &str) -> Result<String, KellyError> {
        if question.trim().is_empty() {
            return Err(KellyError::InvalidRequest(
                "question must not be empty".to_string(),
            ));
        }

        let turn = self
            .transcript
            .begin(ChatMessage::user().content(question).build());

        let Some(credential) = self.credential.as_ref() else {
            turn.revert();
            log::debug!("question submitted without an API key");
            return Err(KellyError::MissingCredential);
        };

        match self.generator.generate_reply(credential, question).await {
            Ok(reply) => {
                turn.commit(ChatMessage::assistant().content(reply.clone()).build());
                Ok(reply)
            }
            Err(e) => {
                turn.fail();
                log::debug!("no reply from provider: {e}");
                Err(e)
            }
        }
    }

    pub async fn generate_reply(
        &self,
        credential: &Credential,
        question: &str,
    ) -> Result<String, KellyError> {
        self.generator.generate_reply(credential, question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;

    fn user(text: &str) -> ChatMessage {
        ChatMessage::user().content(text).build()
    }

    #[test]
    fn commit_appends_reply_after_question() {
        let mut t = Transcript::new();
        let turn = t.begin(user("q"));
        assert_eq!(turn.question().content, "q");
        turn.commit(ChatMessage::assistant().content("a").build());

        let roles: Vec<_> = t.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    }

    #[test]
    fn revert_restores_previous_transcript() {
        let mut t = Transcript::new();
        t.begin(user("first")).commit(ChatMessage::assistant().content("ok").build());
        let before = t.clone();

        t.begin(user("second")).revert();
        assert_eq!(t, before);
    }

    #[test]
    fn fail_and_drop_keep_the_question() {
        let mut t = Transcript::new();
        t.begin(user("one")).fail();
        {
            let _turn = t.begin(user("two"));
        }
        assert_eq!(t.len(), 2);
        assert!(t.iter().all(|m| m.role == ChatRole::User));
    }

    #[test]
    fn blank_credential_is_none() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        assert_eq!(Credential::new(" gsk_123 ").unwrap().expose(), "gsk_123");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let c = Credential::new("gsk_super_secret").unwrap();
        let shown = format!("{c:?}");
        assert!(!shown.contains("gsk_super_secret"));
        assert!(shown.contains("REDACTED"));
    }

    #[test]
    fn default_config_targets_groq() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.model, "llama3-70b-8192");
        assert_eq!(cfg.base_url, "https://api.groq.com/openai/v1/");
        assert_eq!(cfg.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn groq_factory_builds_a_provider() {
        let factory = GroqFactory::new(SessionConfig::default());
        let credential = Credential::new("gsk_test").unwrap();
        assert!(factory.connect(&credential, persona::SYSTEM_PROMPT).is_ok());
    }

    #[test]
    fn groq_factory_reports_bad_base_url() {
        let factory = GroqFactory::new(SessionConfig {
            base_url: "::nope::".into(),
            ..SessionConfig::default()
        });
        let credential = Credential::new("gsk_test").unwrap();
        let err = factory.connect(&credential, persona::SYSTEM_PROMPT).err().unwrap();
        assert!(matches!(err, KellyError::InvalidRequest(_)));
    }
}
