//! Prompt domain
//!
//! Message types, prompt templates and the context builder that assembles the
//! message list for each agent turn.

pub mod context;
pub mod message;
mod template;

pub use context::ContextBuilder;
pub use message::{ChatMessage, MessageRole};
pub use template::{PromptTemplate, format_transcript, interpolate_topic};
