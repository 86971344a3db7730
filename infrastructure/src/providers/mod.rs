//! Model provider adapters
//!
//! - [`openrouter`]: OpenRouter-compatible chat-completions client
//! - [`cache`]: process-wide model id → provider instance cache

pub mod cache;
pub mod openrouter;

pub use cache::ProviderCache;
pub use openrouter::{OpenRouterClient, OpenRouterProvider};
