//! Language-model agent abstraction.
//!
//! The [`LanguageModel`] trait is the only seam through which Atlas talks to
//! an LLM. The extraction and ranking oracles, the weather summarizer and the
//! conversational reply all go through it, so tests can swap in a scripted
//! implementation and deployments can point at any OpenAI-compatible API.

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};

pub mod error;
pub mod factory;
pub mod openai;
pub mod types;

pub use error::AgentError;
pub use factory::create_model;
pub use types::{ChatMessage, CompletionRequest, Role};

/// Unified interface for chat-completion backends.
///
/// Object-safe; used as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Human-readable name for logging (e.g., "openai:gpt-4o").
    fn name(&self) -> &str;

    /// Run a non-streaming completion and return the assistant text.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` with the first choice's content
    /// - `Err(AgentError::Upstream)` if the API returned 4xx/5xx
    /// - `Err(AgentError::Network)` if the connection failed
    /// - `Err(AgentError::Timeout)` if the deadline passed
    /// - `Err(AgentError::InvalidResponse)` if the body was not understood
    async fn complete(&self, request: CompletionRequest) -> Result<String, AgentError>;

    /// Stream the assistant text as deltas.
    ///
    /// Default implementation runs [`complete`](Self::complete) and yields
    /// the whole reply as a single delta.
    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<BoxStream<'static, Result<String, AgentError>>, AgentError> {
        let text = self.complete(request).await?;
        Ok(Box::pin(stream::once(async move { Ok(text) })))
    }
}
