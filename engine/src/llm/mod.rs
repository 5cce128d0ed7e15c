//! Generation Provider Abstraction Layer
//!
//! The interview engine talks to a language model through the `LLMProvider`
//! trait. Providers are opaque text-completion services: they receive an
//! ordered list of role-tagged messages and return free text. No schema is
//! enforced on the output; the assessment parser tolerates whatever comes back.
//!
//! Two call shapes are used by the engine:
//! - [`LLMProvider::complete_chat`]: system instructions plus the replayed
//!   conversation, for the interviewer's next turn
//! - [`LLMProvider::complete_prompt`]: a single prompt at a lower temperature,
//!   for name extraction and the narrative assessment

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod openai;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One role-tagged turn in a conversation
///
/// Turns are immutable once appended to a history; their order is the
/// conversation order and is replayed verbatim to the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Interviewer instructions
    System,

    /// Interviewer (model) turn
    Assistant,

    /// Candidate turn
    User,
}

impl MessageRole {
    /// Upper-case label used in transcripts and prompts
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::System => "SYSTEM",
            MessageRole::Assistant => "ASSISTANT",
            MessageRole::User => "USER",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }

    /// Near-deterministic, short output for pulling a name out of text
    pub fn extraction() -> Self {
        Self::new(0.1, 50)
    }

    /// Low temperature, long output for the narrative assessment
    pub fn narration() -> Self {
        Self::new(0.3, 1000)
    }
}

/// LLM Provider trait that all generation backends implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "openai")
    fn name(&self) -> &str;

    /// Generate a completion for the given ordered messages
    ///
    /// # Returns
    /// * `Ok(String)` - The raw completion text
    /// * `Err(LLMError)` - If the request fails; there is no internal retry
    async fn generate(&self, messages: &[Message], params: GenerationParams) -> Result<String>;

    /// Check if the provider is currently usable
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }

    /// System instructions followed by the conversation turns
    async fn complete_chat(
        &self,
        system_instructions: &str,
        turns: &[Message],
        params: GenerationParams,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(Message::system(system_instructions));
        messages.extend_from_slice(turns);
        self.generate(&messages, params).await
    }

    /// A single user prompt with no history
    async fn complete_prompt(&self, prompt: &str, params: GenerationParams) -> Result<String> {
        self.generate(&[Message::user(prompt)], params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and echoes the message count back
    struct RecordingProvider {
        seen: Mutex<Vec<(Vec<Message>, GenerationParams)>>,
    }

    #[async_trait]
    impl LLMProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, messages: &[Message], params: GenerationParams) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((messages.to_vec(), params));
            Ok(format!("{} messages", messages.len()))
        }
    }

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, MessageRole::User);
        assert_eq!(user_msg.content, "Hello");

        let assistant_msg = Message::assistant("Hi there");
        assert_eq!(assistant_msg.role, MessageRole::Assistant);

        let system_msg = Message::system("You are an interviewer");
        assert_eq!(system_msg.role, MessageRole::System);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(MessageRole::User.label(), "USER");
        assert_eq!(MessageRole::Assistant.label(), "ASSISTANT");
        assert_eq!(MessageRole::User.to_string(), "user");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("test");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"test"}"#);
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[tokio::test]
    async fn test_complete_chat_prepends_system() {
        let provider = RecordingProvider {
            seen: Mutex::new(Vec::new()),
        };
        let turns = vec![Message::user("hi"), Message::assistant("hello")];

        let out = provider
            .complete_chat("be brief", &turns, GenerationParams::new(0.7, 100))
            .await
            .unwrap();
        assert_eq!(out, "3 messages");

        let seen = provider.seen.lock().unwrap();
        let (messages, params) = &seen[0];
        assert_eq!(messages[0], Message::system("be brief"));
        assert_eq!(&messages[1..], turns.as_slice());
        assert_eq!(params.max_tokens, 100);
    }

    #[tokio::test]
    async fn test_complete_prompt_is_single_user_message() {
        let provider = RecordingProvider {
            seen: Mutex::new(Vec::new()),
        };

        provider
            .complete_prompt("name?", GenerationParams::extraction())
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        let (messages, params) = &seen[0];
        assert_eq!(messages.as_slice(), &[Message::user("name?")]);
        assert_eq!(*params, GenerationParams::extraction());
    }
}
