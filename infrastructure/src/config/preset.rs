//! Built-in roundtable used when no preset is given.

use roundtable_domain::{AgentDefinition, RoundtableConfig};

const PANELIST_PROMPT: &str = "You are {{name}}, a panelist in a roundtable discussion about: {{topic}}";

fn panelist(id: &str, name: &str, model: &str, stance: &str) -> AgentDefinition {
    AgentDefinition::panelist(id, name, model).with_system_prompt(format!(
        "{}\n\n{}",
        PANELIST_PROMPT.replace("{{name}}", name),
        stance
    ))
}

/// Three panelists with distinct stances plus a synthesizer.
pub fn default_preset() -> RoundtableConfig {
    RoundtableConfig::new(
        vec![
            panelist(
                "pragmatist",
                "Pragmatist",
                "anthropic/claude-sonnet-4.5",
                "Focus on what works in practice: costs, trade-offs and concrete next steps.",
            ),
            panelist(
                "skeptic",
                "Skeptic",
                "openai/gpt-5.2",
                "Probe weak assumptions and point out risks the others overlook.",
            ),
            panelist(
                "visionary",
                "Visionary",
                "google/gemini-2.5-pro",
                "Look for long-term implications and unconventional options.",
            ),
            AgentDefinition::synthesizer("synthesizer", "Synthesizer", "anthropic/claude-sonnet-4.5")
                .with_system_prompt(
                    "You moderate a roundtable about: {{topic}}\n\nWeigh the panel's arguments fairly and give a clear, actionable answer.",
                ),
        ],
        3,
    )
}
