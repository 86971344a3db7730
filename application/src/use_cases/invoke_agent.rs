//! Bounded invocation of a single agent turn.
//!
//! Every provider call made by the discussion engine goes through
//! [`invoke_bounded`]: it streams the response, forwards each fragment to an
//! `on_chunk` callback in arrival order, and gives up once the wall-clock
//! bound elapses. Giving up only drops the pending future; nothing is sent to
//! the provider.
//!
//! The bound covers the provider side only. Fragments are buffered and
//! forwarded at the pace `on_chunk` allows, so a slow consumer never turns a
//! timely response into a timeout.

use crate::ports::llm_provider::{CompletionOptions, LlmProvider, ProviderError, ProviderResolver};
use futures::StreamExt;
use roundtable_domain::{AgentDefinition, ChatMessage};
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Failure of one agent turn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentTurnError {
    #[error("Agent \"{agent_name}\" ({model}) timed out after {}", format_timeout(.timeout))]
    Timeout {
        agent_name: String,
        model: String,
        timeout: Duration,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// `on_chunk` asked to stop; the provider stream was dropped.
    #[error("Agent \"{agent_name}\" stopped: nobody is listening")]
    Abandoned { agent_name: String },
}

fn format_timeout(timeout: &Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

/// Stream one response from `provider`, bounded by `timeout`.
///
/// Returns the concatenation of all fragments. Provider failures propagate
/// unchanged as [`AgentTurnError::Provider`]. Returning
/// [`ControlFlow::Break`] from `on_chunk` drops the provider stream and ends
/// the turn with [`AgentTurnError::Abandoned`].
pub async fn invoke_bounded<F, Fut>(
    provider: &dyn LlmProvider,
    agent: &AgentDefinition,
    messages: &[ChatMessage],
    timeout: Duration,
    mut on_chunk: F,
) -> Result<String, AgentTurnError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ControlFlow<()>>,
{
    let options = CompletionOptions::from_agent(agent);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let call = async move {
        let mut stream = provider.stream(messages, &options).await?;
        let mut full_response = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            full_response.push_str(&chunk);
            let _ = tx.send(chunk);
        }
        Ok::<_, ProviderError>(full_response)
    };

    let pull = async {
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(response)) => {
                debug!(
                    "Agent {} ({}) responded with {} chars",
                    agent.id,
                    agent.model,
                    response.len()
                );
                Ok(response)
            }
            Ok(Err(e)) => Err(AgentTurnError::from(e)),
            Err(_) => {
                warn!(
                    "Agent {} ({}) timed out after {:?}",
                    agent.id, agent.model, timeout
                );
                Err(AgentTurnError::Timeout {
                    agent_name: agent.name.clone(),
                    model: agent.model.clone(),
                    timeout,
                })
            }
        }
    };

    // Ends once the sender is dropped with the finished call.
    let forward = async {
        while let Some(chunk) = rx.recv().await {
            if on_chunk(chunk).await.is_break() {
                debug!("Agent {} abandoned mid-stream", agent.id);
                return Err(AgentTurnError::Abandoned {
                    agent_name: agent.name.clone(),
                });
            }
        }
        Ok(())
    };

    let (response, ()) = tokio::try_join!(pull, forward)?;
    Ok(response)
}

/// Resolve the agent's provider, then run [`invoke_bounded`].
///
/// A resolver failure is reported as a failure of the turn.
pub async fn invoke_agent<F, Fut>(
    resolver: &dyn ProviderResolver,
    agent: &AgentDefinition,
    messages: &[ChatMessage],
    timeout: Duration,
    on_chunk: F,
) -> Result<String, AgentTurnError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ControlFlow<()>>,
{
    let provider = resolver.resolve(&agent.model)?;
    invoke_bounded(provider.as_ref(), agent, messages, timeout, on_chunk).await
}
