//! Application layer for roundtable
//!
//! This crate contains the discussion engine use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DiscussionParams;
pub use ports::{
    llm_provider::{
        CompletionOptions, LlmProvider, ProviderError, ProviderResolver, TextStream, collect_text,
    },
    recorder::{CompositeRecorder, EventRecorder, NoRecorder},
};
pub use use_cases::invoke_agent::{AgentTurnError, invoke_agent, invoke_bounded};
pub use use_cases::run_roundtable::{RoundtableEvents, RunRoundtableInput, RunRoundtableUseCase};
