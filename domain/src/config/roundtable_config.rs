//! Roundtable configuration supplied by the caller.

use super::validation::{ConfigIssue, ConfigIssueCode, Severity};
use crate::agent::{AgentDefinition, AgentRole};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Upper bound on `max_rounds`.
pub const MAX_ROUNDS_LIMIT: u32 = 10;

/// The panel and its discussion limits.
///
/// Owned by the caller; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundtableConfig {
    pub agents: Vec<AgentDefinition>,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    /// Per-agent timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_timeout: Option<u64>,
}

fn default_max_rounds() -> u32 {
    3
}

impl RoundtableConfig {
    pub fn new(agents: Vec<AgentDefinition>, max_rounds: u32) -> Self {
        Self {
            agents,
            max_rounds,
            agent_timeout: None,
        }
    }

    pub fn with_agent_timeout(mut self, seconds: u64) -> Self {
        self.agent_timeout = Some(seconds);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn agent_timeout_duration(&self) -> Option<Duration> {
        self.agent_timeout.map(Duration::from_secs)
    }

    /// Check structural constraints and return every issue found.
    ///
    /// Error-severity issues make the config unusable; warnings are reported
    /// but the config still runs.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.agents.len() < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TooFewAgents {
                    count: self.agents.len(),
                },
                format!(
                    "at least 2 agents are required, found {}",
                    self.agents.len()
                ),
            ));
        }

        let synthesizers = self
            .agents
            .iter()
            .filter(|a| a.role == AgentRole::Synthesizer)
            .count();
        match synthesizers {
            0 => issues.push(ConfigIssue::error(
                ConfigIssueCode::NoSynthesizer,
                "no agent has role 'synthesizer'",
            )),
            1 => {}
            n => issues.push(ConfigIssue::warning(
                ConfigIssueCode::MultipleSynthesizers { count: n },
                format!("{} synthesizers defined; only the first one is used", n),
            )),
        }

        if !self.agents.iter().any(|a| a.role == AgentRole::Panelist) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoPanelists,
                "no agent has role 'panelist'; the discussion will fail to start",
            ));
        }

        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MaxRoundsOutOfRange {
                    value: self.max_rounds,
                },
                format!(
                    "max_rounds must be between 1 and {}, got {}",
                    MAX_ROUNDS_LIMIT, self.max_rounds
                ),
            ));
        }

        if self.agent_timeout == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "agent_timeout cannot be 0",
            ));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateAgentId {
                        id: agent.id.clone(),
                    },
                    format!("agent id '{}' is used more than once", agent.id),
                ));
            }

            if agent.model.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModel {
                        agent_id: agent.id.clone(),
                    },
                    format!("agent '{}' has an empty model name", agent.id),
                ));
            }

            if let Some(t) = agent.temperature
                && !(0.0..=2.0).contains(&t)
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::TemperatureOutOfRange {
                        agent_id: agent.id.clone(),
                    },
                    format!(
                        "agent '{}' temperature must be between 0 and 2, got {}",
                        agent.id, t
                    ),
                ));
            }

            if agent.max_tokens == Some(0) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidMaxTokens {
                        agent_id: agent.id.clone(),
                    },
                    format!("agent '{}' max_tokens must be positive", agent.id),
                ));
            }
        }

        issues
    }

    /// Returns true if any issue has Error severity.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
