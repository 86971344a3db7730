//! Discussion configuration from TOML (`[discussion]` section)

use roundtable_application::DiscussionParams;
use roundtable_domain::{ConfigIssue, ConfigIssueCode, MAX_ROUNDS_LIMIT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw discussion defaults from TOML
///
/// These apply when the preset does not set its own value and no CLI flag
/// overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Rounds before synthesis
    pub max_rounds: u32,
    /// Wall-clock bound for one agent call
    pub agent_timeout_seconds: u64,
    /// Event channel capacity
    pub event_buffer: usize,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            agent_timeout_seconds: 120,
            event_buffer: 16,
        }
    }
}

impl FileDiscussionConfig {
    pub fn discussion_params(&self) -> DiscussionParams {
        DiscussionParams::default()
            .with_agent_timeout(Duration::from_secs(self.agent_timeout_seconds))
            .with_event_buffer(self.event_buffer)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MaxRoundsOutOfRange {
                    value: self.max_rounds,
                },
                format!(
                    "discussion.max_rounds must be between 1 and {}, got {}",
                    MAX_ROUNDS_LIMIT, self.max_rounds
                ),
            ));
        }
        if self.agent_timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "discussion.agent_timeout_seconds cannot be 0",
            ));
        }
        if self.event_buffer == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidSetting {
                    field: "discussion.event_buffer".to_string(),
                },
                "discussion.event_buffer is 0, using 1",
            ));
        }

        issues
    }
}
