//! OpenRouter-compatible chat-completions provider.
//!
//! Speaks the OpenAI-style `/chat/completions` API with SSE streaming.
//! Cache-hinted messages are sent as content parts carrying
//! `cache_control: {"type": "ephemeral"}`, which OpenRouter forwards to
//! providers that support prefix caching.

mod client;
mod types;

pub use client::{OpenRouterClient, OpenRouterProvider};
