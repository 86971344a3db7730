//! Console renderer for roundtable events

use colored::Colorize;
use roundtable_application::EventRecorder;
use roundtable_domain::{AgentRole, DiscussionStats, OutputFormat, RoundtableEvent};
use std::io::Write;

/// Where a rendered piece of output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Stdout(String),
    Stderr(String),
}

/// Renders events to the terminal as they arrive
pub struct ConsoleRenderer {
    format: OutputFormat,
}

impl ConsoleRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render one event for the configured format.
    pub fn render(&self, event: &RoundtableEvent) -> Option<Rendered> {
        match self.format {
            OutputFormat::Full => Self::render_full(event),
            OutputFormat::Answer => Self::render_answer(event),
            OutputFormat::Json => Self::render_json(event),
        }
    }

    fn render_full(event: &RoundtableEvent) -> Option<Rendered> {
        let text = match event {
            RoundtableEvent::RoundtableStart {
                topic,
                agents,
                max_rounds,
            } => {
                let mut output = Self::header("Roundtable");
                output.push_str(&format!("\n{} {}\n", "Topic:".cyan().bold(), topic));
                output.push_str(&format!("{} {}\n", "Rounds:".cyan().bold(), max_rounds));
                output.push_str(&format!("{}\n", "Panel:".cyan().bold()));
                for agent in agents {
                    let role = match agent.role {
                        AgentRole::Synthesizer => format!(" [{}]", agent.role).dimmed().to_string(),
                        _ => String::new(),
                    };
                    output.push_str(&format!("  * {} ({}){}\n", agent.name, agent.model, role));
                }
                output
            }
            RoundtableEvent::RoundStart { round, mode } => {
                Self::section_header(&format!("Round {} ({})", round, mode))
            }
            RoundtableEvent::AgentStart { agent_name, .. } => {
                format!("\n{}\n", format!("── {} ──", agent_name).yellow().bold())
            }
            RoundtableEvent::AgentChunk { text, .. } | RoundtableEvent::SynthesisChunk { text } => {
                text.clone()
            }
            RoundtableEvent::AgentDone { .. } | RoundtableEvent::SynthesisDone { .. } => {
                "\n".to_string()
            }
            RoundtableEvent::RoundEnd { .. } => return None,
            RoundtableEvent::SynthesisStart { agent_name, model } => {
                let mut output = Self::section_header("Synthesis");
                output.push_str(&format!(
                    "\n{}\n\n",
                    format!("{} ({})", agent_name, model).yellow().bold()
                ));
                output
            }
            RoundtableEvent::RoundtableDone { stats, .. } => {
                format!("\n{}{}", Self::format_stats(stats), Self::footer())
            }
            RoundtableEvent::Error { agent_id, error } => {
                return Some(Rendered::Stderr(Self::format_error(agent_id.as_deref(), error)));
            }
        };
        Some(Rendered::Stdout(text))
    }

    fn render_answer(event: &RoundtableEvent) -> Option<Rendered> {
        match event {
            RoundtableEvent::SynthesisChunk { text } => Some(Rendered::Stdout(text.clone())),
            RoundtableEvent::SynthesisDone { .. } => Some(Rendered::Stdout("\n".to_string())),
            RoundtableEvent::Error { agent_id, error } => Some(Rendered::Stderr(
                Self::format_error(agent_id.as_deref(), error),
            )),
            _ => None,
        }
    }

    fn render_json(event: &RoundtableEvent) -> Option<Rendered> {
        serde_json::to_string(event)
            .ok()
            .map(|line| Rendered::Stdout(format!("{}\n", line)))
    }

    fn format_error(agent_id: Option<&str>, error: &str) -> String {
        match agent_id {
            Some(id) => format!("{} {}: {}\n", "x".red().bold(), id, error.red()),
            None => format!("{} {}\n", "Error:".red().bold(), error.red()),
        }
    }

    /// One-line run summary
    pub fn format_stats(stats: &DiscussionStats) -> String {
        format!(
            "{} {} rounds | {} agents | ~{} tokens | {:.1}s\n",
            "Stats:".dimmed(),
            stats.total_rounds,
            stats.total_agents,
            stats.total_tokens_estimate,
            stats.duration_ms as f64 / 1000.0
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

impl EventRecorder for ConsoleRenderer {
    fn handle_event(&self, event: &RoundtableEvent) {
        match self.render(event) {
            Some(Rendered::Stdout(text)) => {
                let mut stdout = std::io::stdout().lock();
                let _ = stdout.write_all(text.as_bytes());
                let _ = stdout.flush();
            }
            Some(Rendered::Stderr(text)) => {
                let _ = std::io::stderr().lock().write_all(text.as_bytes());
            }
            None => {}
        }
    }
}
