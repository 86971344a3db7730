//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished (or streaming) discussion is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round, every agent, then the synthesis (default)
    #[default]
    Full,
    /// Only the synthesizer's final answer
    Answer,
    /// One JSON event per line
    Json,
}
