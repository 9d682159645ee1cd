//! Builds the configured [`LanguageModel`] trait object.

use super::{openai::OpenAIAgent, AgentError, LanguageModel};
use crate::config::{LlmConfig, LlmProvider};
use reqwest::Client;
use std::sync::Arc;

/// Create the language model described by `[llm]`.
///
/// Returns `Ok(None)` when the model is disabled or its API key is not set;
/// callers then run without re-ranking, extraction or weather summaries.
///
/// # Examples
///
/// ```
/// use atlas::agent::create_model;
/// use atlas::config::{LlmConfig, LlmProvider};
/// use reqwest::Client;
/// use std::sync::Arc;
///
/// let config = LlmConfig {
///     provider: LlmProvider::Disabled,
///     ..Default::default()
/// };
/// let model = create_model(&config, Arc::new(Client::new())).unwrap();
/// assert!(model.is_none());
/// ```
pub fn create_model(
    config: &LlmConfig,
    client: Arc<Client>,
) -> Result<Option<Arc<dyn LanguageModel>>, AgentError> {
    match config.provider {
        LlmProvider::Disabled => Ok(None),
        LlmProvider::OpenAI => {
            if config.base_url.trim().is_empty() {
                return Err(AgentError::Configuration(
                    "llm.base_url cannot be empty".to_string(),
                ));
            }

            let Some(api_key) = config.api_key() else {
                tracing::warn!(
                    env = %config.api_key_env,
                    "No API key for the language model; running without LLM features"
                );
                return Ok(None);
            };

            Ok(Some(Arc::new(OpenAIAgent::new(
                config.base_url.clone(),
                api_key,
                config.model.clone(),
                config.temperature,
                config.timeout(),
                client,
            ))))
        }
    }
}
