//! The roundtable event stream.
//!
//! [`RoundtableEvent`] is the only channel through which a run's progress is
//! observable. Every consumer (terminal renderer, JSONL recorder, JSON output)
//! receives the same closed set of variants in the same order. Events are
//! never retracted.
//!
//! The wire shape is a `type`-tagged object with camelCase fields:
//!
//! ```json
//! {"type":"agent_done","agentId":"a","agentName":"Alice","fullResponse":"...","round":1,"model":"..."}
//! ```

use super::stats::DiscussionStats;
use crate::agent::{AgentSummary, RoundMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RoundtableEvent {
    RoundtableStart {
        topic: String,
        agents: Vec<AgentSummary>,
        max_rounds: u32,
    },
    RoundStart {
        round: u32,
        mode: RoundMode,
    },
    AgentStart {
        agent_id: String,
        agent_name: String,
        round: u32,
    },
    AgentChunk {
        agent_id: String,
        text: String,
    },
    AgentDone {
        agent_id: String,
        agent_name: String,
        full_response: String,
        round: u32,
        model: String,
    },
    RoundEnd {
        round: u32,
    },
    SynthesisStart {
        agent_name: String,
        model: String,
    },
    SynthesisChunk {
        text: String,
    },
    SynthesisDone {
        answer: String,
    },
    RoundtableDone {
        answer: String,
        stats: DiscussionStats,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent_id: Option<String>,
        error: String,
    },
}

impl RoundtableEvent {
    /// Error event not scoped to any agent.
    pub fn fatal(error: impl Into<String>) -> Self {
        RoundtableEvent::Error {
            agent_id: None,
            error: error.into(),
        }
    }

    /// Error event scoped to one agent.
    pub fn agent_error(agent_id: impl Into<String>, error: impl Into<String>) -> Self {
        RoundtableEvent::Error {
            agent_id: Some(agent_id.into()),
            error: error.into(),
        }
    }

    /// Wire name of the variant (`"round_start"`, `"agent_done"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            RoundtableEvent::RoundtableStart { .. } => "roundtable_start",
            RoundtableEvent::RoundStart { .. } => "round_start",
            RoundtableEvent::AgentStart { .. } => "agent_start",
            RoundtableEvent::AgentChunk { .. } => "agent_chunk",
            RoundtableEvent::AgentDone { .. } => "agent_done",
            RoundtableEvent::RoundEnd { .. } => "round_end",
            RoundtableEvent::SynthesisStart { .. } => "synthesis_start",
            RoundtableEvent::SynthesisChunk { .. } => "synthesis_chunk",
            RoundtableEvent::SynthesisDone { .. } => "synthesis_done",
            RoundtableEvent::RoundtableDone { .. } => "roundtable_done",
            RoundtableEvent::Error { .. } => "error",
        }
    }

    /// Agent the event refers to, when it refers to exactly one.
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            RoundtableEvent::AgentStart { agent_id, .. }
            | RoundtableEvent::AgentChunk { agent_id, .. }
            | RoundtableEvent::AgentDone { agent_id, .. } => Some(agent_id),
            RoundtableEvent::Error { agent_id, .. } => agent_id.as_deref(),
            _ => None,
        }
    }

    /// Streaming text fragment carried by chunk events.
    pub fn chunk_text(&self) -> Option<&str> {
        match self {
            RoundtableEvent::AgentChunk { text, .. }
            | RoundtableEvent::SynthesisChunk { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RoundtableEvent::Error { .. })
    }
}
