//! Context assembly for one agent turn.
//!
//! The message list for a panelist turn has up to three parts:
//!
//! | # | role   | content                                   | cache hint            |
//! |---|--------|-------------------------------------------|-----------------------|
//! | 1 | system | agent prompt with `{{topic}}` interpolated | if model supports it  |
//! | 2 | user   | topic + transcript of earlier rounds       | if model supports it  |
//! | 3 | user   | this round's earlier answers + turn prompt | never                 |
//!
//! Message 2 is byte-identical for every panelist within a round, so a
//! caching-capable provider can reuse the computed prefix across the
//! sequential calls of that round. Message 3 depends on the speaker's position
//! and is never marked as a stable prefix.
//!
//! Round 1 with an empty transcript collapses 2 and 3 into a single uncached
//! opening message.

use super::message::ChatMessage;
use super::template::{PromptTemplate, interpolate_topic};
use crate::agent::AgentDefinition;
use crate::core::model::supports_prefix_caching;
use crate::discussion::Transcript;

/// Builds message lists for a fixed topic
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder<'a> {
    topic: &'a str,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(topic: &'a str) -> Self {
        Self { topic }
    }

    /// System message for `agent`, cache-marked for caching-capable models.
    pub fn system_message(&self, agent: &AgentDefinition) -> ChatMessage {
        ChatMessage::system(interpolate_topic(&agent.system_prompt, self.topic))
            .cached(supports_prefix_caching(&agent.model))
    }

    /// Messages for a panelist speaking in `round` given the transcript as it
    /// stands right now (including this round's earlier speakers).
    pub fn panelist_messages(
        &self,
        agent: &AgentDefinition,
        round: u32,
        transcript: &Transcript,
    ) -> Vec<ChatMessage> {
        let system = self.system_message(agent);

        if round == 1 && transcript.is_empty() {
            return vec![system, ChatMessage::user(PromptTemplate::opening(self.topic))];
        }

        let prior = transcript.before_round(round);
        let current = transcript.in_round(round);

        vec![
            system,
            ChatMessage::user(PromptTemplate::discussion_context(self.topic, &prior))
                .cached(supports_prefix_caching(&agent.model)),
            ChatMessage::user(PromptTemplate::turn(round, &current)),
        ]
    }

    /// Messages for the synthesizer: system prompt plus one message holding
    /// the entire transcript and the synthesis instruction.
    pub fn synthesizer_messages(
        &self,
        agent: &AgentDefinition,
        transcript: &Transcript,
    ) -> Vec<ChatMessage> {
        vec![
            self.system_message(agent),
            ChatMessage::user(PromptTemplate::synthesis(self.topic, transcript.entries()))
                .cached(supports_prefix_caching(&agent.model)),
        ]
    }
}
