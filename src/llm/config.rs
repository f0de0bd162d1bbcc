//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Required:
    /// - `ANTHROPIC_API_KEY`
    ///
    /// Optional:
    /// - `LLM_MODEL`: defaults to [`DEFAULT_MODEL`]
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the key is absent.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| LlmError::MissingApiKey { var: "ANTHROPIC_API_KEY".into() })?;
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeouts = LlmTimeouts {
            request_secs: parse_secs(
                std::env::var("LLM_REQUEST_TIMEOUT_SECS").ok().as_deref(),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: parse_secs(
                std::env::var("LLM_CONNECT_TIMEOUT_SECS").ok().as_deref(),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
        };
        Ok(Self { api_key, model, timeouts })
    }
}

fn parse_secs(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
