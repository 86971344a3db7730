use super::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ErrorResponse, WireMessage,
};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::{Client, Response};
use roundtable_application::{CompletionOptions, LlmProvider, ProviderError, TextStream};
use roundtable_domain::ChatMessage;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const DEFAULT_MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;
const MAX_BACKOFF_MS: u64 = 60000;

/// HTTP client for an OpenRouter-compatible API
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    max_retries: u32,
    initial_backoff: Duration,
}

impl OpenRouterClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }

    /// Build a client whose requests time out after `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => warn!("Could not apply request timeout, using default client: {}", e),
        }
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Run `operation`, retrying rate limits and server errors with
    /// exponential backoff.
    async fn with_retry<T, F, Fut>(&self, operation: F, operation_name: &str) -> Result<T, ProviderError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, ProviderError>>,
    {
        let max_backoff = Duration::from_millis(MAX_BACKOFF_MS);
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    let wait = match &e {
                        ProviderError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs(*secs),
                        _ => backoff,
                    }
                    .min(max_backoff);

                    warn!(
                        "{} failed ({}), retrying in {}ms (attempt {}/{})",
                        operation_name,
                        e,
                        wait.as_millis(),
                        retries + 1,
                        self.max_retries
                    );

                    tokio::time::sleep(wait).await;
                    retries += 1;
                    backoff = (backoff * 2).min(max_backoff);
                }
                Err(e) => {
                    if retries > 0 {
                        error!("{} failed after {} retries: {}", operation_name, retries, e);
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn post_chat(&self, request: &ChatCompletionRequest) -> Result<Response, ProviderError> {
        debug!(
            "POST {}/chat/completions model={} messages={} stream={}",
            self.base_url,
            request.model,
            request.messages.len(),
            request.stream
        );

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        check_status(response).await
    }

    /// One-shot completion for `model`.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        let request = build_request(model, messages, options, false);

        let response = self
            .with_retry(|| self.post_chat(&request), "chat_completion")
            .await?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("invalid response body: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::RequestFailed("No completion returned".to_string()))
    }

    /// Streaming completion for `model`.
    ///
    /// Retries apply only until the response headers arrive; once fragments
    /// flow, a failure ends the stream with [`ProviderError::StreamError`].
    pub async fn chat_completion_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<TextStream, ProviderError> {
        let request = build_request(model, messages, options, true);

        let response = self
            .with_retry(|| self.post_chat(&request), "chat_completion_stream")
            .await?;

        let content_stream = response
            .bytes_stream()
            .map(|r| r.map_err(std::io::Error::other))
            .eventsource()
            .filter_map(|event_result| async move {
                match event_result {
                    Ok(event) => {
                        if event.data == "[DONE]" {
                            return None;
                        }
                        match serde_json::from_str::<ChatCompletionChunk>(&event.data) {
                            Ok(chunk) => {
                                if let Some(err) = chunk.error {
                                    return Some(Err(ProviderError::StreamError(err.message)));
                                }
                                chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|c| c.delta.content)
                                    .filter(|text| !text.is_empty())
                                    .map(Ok)
                            }
                            Err(e) => {
                                warn!("Failed to parse SSE chunk: {}", e);
                                None
                            }
                        }
                    }
                    Err(e) => Some(Err(ProviderError::StreamError(format!("SSE error: {}", e)))),
                }
            });

        Ok(content_stream.boxed())
    }
}

fn build_request(
    model: &str,
    messages: &[ChatMessage],
    options: &CompletionOptions,
    stream: bool,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: messages.iter().map(WireMessage::from).collect(),
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        stream,
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_connect() || e.is_timeout() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Turn non-success responses into provider errors.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        info!("Rate limited by provider (retry after {:?}s)", retry_after);
        return Err(ProviderError::RateLimited { retry_after });
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
        Ok(body) => body.error.message,
        Err(_) => error_text,
    };

    if status.as_u16() == 404 {
        return Err(ProviderError::ModelNotAvailable(message));
    }

    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

/// [`LlmProvider`] bound to one model
pub struct OpenRouterProvider {
    client: OpenRouterClient,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        self.client
            .chat_completion(&self.model, messages, options)
            .await
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<TextStream, ProviderError> {
        self.client
            .chat_completion_stream(&self.model, messages, options)
            .await
    }
}
