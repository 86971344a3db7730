//! Prompt templates for the roundtable flow

use crate::discussion::TranscriptEntry;
use std::collections::BTreeMap;

/// Replace `{{topic}}` (inner whitespace allowed) with `topic`.
///
/// No other variable is recognised: any other `{{key}}`, and an unclosed
/// `{{`, is kept as literal text.
pub fn interpolate_topic(template: &str, topic: &str) -> String {
    let mut out = String::with_capacity(template.len() + topic.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) if after_open[..end].trim() == "topic" => {
                out.push_str(topic);
                rest = &after_open[end + 2..];
            }
            Some(end) => {
                out.push_str(&rest[start..start + 2 + end + 2]);
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render entries grouped by round ascending, one `## Round N` section per
/// round, each entry as `name: response` in transcript order.
pub fn format_transcript<'a>(entries: impl IntoIterator<Item = &'a TranscriptEntry>) -> String {
    let mut rounds: BTreeMap<u32, Vec<&TranscriptEntry>> = BTreeMap::new();
    for entry in entries {
        rounds.entry(entry.round).or_default().push(entry);
    }

    rounds
        .into_iter()
        .map(|(round, entries)| {
            let body = entries
                .iter()
                .map(|e| format!("{}: {}", e.agent_name, e.response))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("## Round {}\n\n{}", round, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Round-1 prompt when nobody has spoken yet
    pub fn opening(topic: &str) -> String {
        format!(
            r#"Topic for discussion: {}

Share your perspective on this topic. Be concise but substantive, and make your reasoning explicit so other panelists can respond to it."#,
            topic
        )
    }

    /// Stable context shared by every panelist in a round
    pub fn discussion_context(topic: &str, prior: &[&TranscriptEntry]) -> String {
        if prior.is_empty() {
            return format!("Topic for discussion: {}", topic);
        }
        format!(
            "Topic for discussion: {}\n\nDiscussion so far:\n\n{}",
            topic,
            format_transcript(prior.iter().copied())
        )
    }

    /// Per-turn instruction, preceded by what was already said this round
    pub fn turn(round: u32, current: &[&TranscriptEntry]) -> String {
        let mut prompt = String::new();
        if !current.is_empty() {
            prompt.push_str(&format!("Responses so far in round {}:\n\n", round));
            let said = current
                .iter()
                .map(|e| format!("{}: {}", e.agent_name, e.response))
                .collect::<Vec<_>>()
                .join("\n\n");
            prompt.push_str(&said);
            prompt.push_str("\n\n");
        }
        prompt.push_str(&format!(
            "It is your turn to speak in round {}. Respond to the points raised so far: build on them, challenge them, or refine your own position. Be concise but substantive.",
            round
        ));
        prompt
    }

    /// Single message given to the synthesizer
    pub fn synthesis(topic: &str, transcript: &[TranscriptEntry]) -> String {
        format!(
            r#"Topic for discussion: {}

Full discussion transcript:

{}

Synthesize this discussion into a final answer:
1. State the conclusion the panel's strongest arguments support
2. Identify points of consensus
3. Note remaining disagreements and which position is better supported

Format your answer with clear markdown headers."#,
            topic,
            format_transcript(transcript)
        )
    }
}
