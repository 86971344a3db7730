//! LLM provider port
//!
//! Defines the only capability the discussion engine needs from a model
//! provider: turn a message list into text, either in one shot or as a lazy
//! stream of fragments. Transport details (HTTP, SSE, cache-control wire
//! format, rate-limit backoff) live entirely in the infrastructure adapters.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use roundtable_domain::{AgentDefinition, ChatMessage};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during provider operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited by provider")]
    RateLimited { retry_after: Option<u64> },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl ProviderError {
    /// Whether a provider-side retry with backoff may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } | ProviderError::ConnectionError(_) => true,
            ProviderError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Sampling options derived from an agent definition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn from_agent(agent: &AgentDefinition) -> Self {
        Self {
            temperature: agent.temperature,
            max_tokens: agent.max_tokens,
        }
    }
}

/// Lazy, finite, non-restartable sequence of text fragments.
pub type TextStream = BoxStream<'static, Result<String, ProviderError>>;

/// A resolved model provider.
///
/// Implementations are stateless after construction and may be shared
/// across concurrent discussions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the messages and return the full response text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, ProviderError>;

    /// Send the messages and return the response as a fragment stream.
    ///
    /// Default implementation calls `complete()` and yields its result as a
    /// single fragment, so non-streaming providers work unchanged.
    async fn stream(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<TextStream, ProviderError> {
        let text = self.complete(messages, options).await?;
        Ok(futures::stream::once(async move { Ok(text) }).boxed())
    }
}

/// Maps a model identifier to a provider instance.
pub trait ProviderResolver: Send + Sync {
    fn resolve(&self, model: &str) -> Result<Arc<dyn LlmProvider>, ProviderError>;
}

/// Consume a fragment stream and concatenate all text.
pub async fn collect_text(mut stream: TextStream) -> Result<String, ProviderError> {
    let mut full_text = String::new();
    while let Some(chunk) = stream.next().await {
        full_text.push_str(&chunk?);
    }
    Ok(full_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneShot;

    #[async_trait]
    impl LlmProvider for OneShot {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<String, ProviderError> {
            Ok(format!("{} messages", messages.len()))
        }
    }

    #[tokio::test]
    async fn test_default_stream_yields_complete_text_once() {
        let provider = OneShot;
        let stream = provider
            .stream(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await
            .unwrap();
        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks, vec![Ok("1 messages".to_string())]);
    }

    #[tokio::test]
    async fn test_collect_text_stops_at_first_error() {
        let stream: TextStream = futures::stream::iter(vec![
            Ok("a".to_string()),
            Err(ProviderError::StreamError("cut".to_string())),
            Ok("b".to_string()),
        ])
        .boxed();
        assert_eq!(
            collect_text(stream).await,
            Err(ProviderError::StreamError("cut".to_string()))
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ProviderError::RateLimited { retry_after: None }.is_retryable());
        assert!(
            ProviderError::Api {
                status: 503,
                message: "busy".to_string()
            }
            .is_retryable()
        );
        assert!(
            !ProviderError::Api {
                status: 400,
                message: "bad".to_string()
            }
            .is_retryable()
        );
        assert!(!ProviderError::ModelNotAvailable("x".to_string()).is_retryable());
    }

    #[test]
    fn test_options_from_agent() {
        let agent = AgentDefinition::panelist("a", "A", "m")
            .with_temperature(0.3)
            .with_max_tokens(64);
        let options = CompletionOptions::from_agent(&agent);
        assert_eq!(options.temperature, Some(0.3));
        assert_eq!(options.max_tokens, Some(64));
    }
}
