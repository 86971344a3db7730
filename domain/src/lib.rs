//! Domain layer for roundtable
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Panelist**: speaks once per round, in configured order
//! - **Synthesizer**: reads the whole transcript after the last round and
//!   produces the final answer
//! - **Round**: round 1 fans out concurrently, later rounds take turns
//! - **Event stream**: [`RoundtableEvent`] is the only observable record of a run

pub mod agent;
pub mod config;
pub mod core;
pub mod discussion;
pub mod prompt;

// Re-export commonly used types
pub use agent::{AgentDefinition, AgentRole, AgentSummary, RoleProtocol, RoundMode};
pub use config::{
    ConfigIssue, ConfigIssueCode, MAX_ROUNDS_LIMIT, OutputFormat, RoundtableConfig, Severity,
};
pub use core::{
    error::DomainError,
    model::{ModelFamily, supports_prefix_caching},
};
pub use discussion::{
    DiscussionStats, RoundtableEvent, RoundtableOutcome, Transcript, TranscriptEntry,
    estimate_tokens,
};
pub use prompt::{ChatMessage, ContextBuilder, MessageRole, PromptTemplate};
