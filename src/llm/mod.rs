//! LLM adapter for the AI assistant.
//!
//! DESIGN
//! ======
//! The board service only talks to the [`LlmChat`] trait; the concrete
//! [`LlmClient`] wraps the Anthropic Messages API client and is built
//! from environment variables at startup. Keeping the trait at the
//! seam lets the AI service tests run against a mock.

pub mod anthropic;
pub mod config;
pub mod tools;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatResponse, LlmError, Message, Tool};

/// Concrete LLM client configured from environment variables.
pub struct LlmClient {
    inner: anthropic::AnthropicClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ANTHROPIC_API_KEY` is missing or the HTTP
    /// client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = anthropic::AnthropicClient::new(config.api_key, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// The configured model name (e.g. `"claude-sonnet-4-20250514"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<ChatResponse, LlmError> {
        self.inner
            .chat(&self.model, max_tokens, system, messages, tools)
            .await
    }
}
