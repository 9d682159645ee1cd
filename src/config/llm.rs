//! Language-model configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which chat-completions protocol to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI `/v1/chat/completions` (or any compatible server)
    #[default]
    OpenAI,
    /// No language model; oracles return empty/identity results
    Disabled,
}

/// `[llm]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    /// Model for slot extraction, ranking and weather summaries
    pub model: String,
    /// Model for the conversational reply
    pub chat_model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Temperature for the oracles and summaries
    pub temperature: f32,
    /// Temperature for the conversational reply
    pub chat_temperature: f32,
    /// Deadline for a single model call
    pub timeout_seconds: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Resolve the API key from the configured environment variable.
    ///
    /// Blank values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.5,
            chat_temperature: 0.7,
            timeout_seconds: 60,
        }
    }
}
