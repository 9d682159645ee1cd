//! OpenAI-compatible chat-completions agent.

use super::types::{OpenAIChatRequest, OpenAIChatResponse, OpenAIStreamChunk};
use super::{AgentError, CompletionRequest, LanguageModel};
use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Agent for `POST /v1/chat/completions` with Bearer authentication.
///
/// Works against api.openai.com and any server speaking the same protocol.
pub struct OpenAIAgent {
    /// Human-readable name
    name: String,
    /// Base URL (e.g., "https://api.openai.com")
    base_url: String,
    /// API key for Bearer authentication
    api_key: String,
    /// Model used when the request does not override it
    model: String,
    /// Temperature used when the request does not override it
    temperature: f32,
    /// Per-request deadline
    timeout: Duration,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
}

impl OpenAIAgent {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: f32,
        timeout: Duration,
        client: Arc<Client>,
    ) -> Self {
        Self {
            name: format!("openai:{}", model),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature,
            timeout,
            client,
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, AgentError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = OpenAIChatRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature.unwrap_or(self.temperature),
            stream,
        };

        tracing::debug!(
            agent = %self.name,
            model = %model,
            messages = request.messages.len(),
            stream,
            "Sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AgentError::from_reqwest(e, self.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for OpenAIAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AgentError> {
        let response = self.send(&request, false).await?;

        let completion: OpenAIChatResponse = response.json().await.map_err(|e| {
            AgentError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentError::InvalidResponse("Completion has no content".to_string()))
    }

    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<BoxStream<'static, Result<String, AgentError>>, AgentError> {
        let response = self.send(&request, true).await?;
        let mut byte_stream = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(AgentError::Network(e.to_string()));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // Process complete lines
                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim().to_string();
                    buffer.drain(..=pos);

                    let Some(data) = line.strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        return;
                    }
                    match serde_json::from_str::<OpenAIStreamChunk>(data) {
                        Ok(chunk) => {
                            let delta: String = chunk
                                .choices
                                .into_iter()
                                .filter_map(|c| c.delta.content)
                                .collect();
                            if !delta.is_empty() {
                                yield Ok(delta);
                            }
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "Skipping unparsable stream chunk");
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
