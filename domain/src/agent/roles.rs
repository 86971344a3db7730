//! Role protocol: who speaks, in which order, and whether a round fans out.
//!
//! Panelists speak in configured list order. That order fixes both the
//! fan-out order of the concurrent round and the turn order of sequential
//! rounds. Round 1 has no prior transcript to depend on, so its panelists are
//! independent and run concurrently; from round 2 on each panelist's prompt
//! includes the answers of earlier panelists in the same round, so turns are
//! strictly sequential.

use super::entities::AgentDefinition;
use serde::{Deserialize, Serialize};

/// Execution mode of a discussion round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundMode {
    Concurrent,
    Sequential,
}

impl RoundMode {
    /// Mode used for the given 1-based round number.
    pub fn for_round(round: u32) -> Self {
        if RoleProtocol::is_concurrent_round(round) {
            RoundMode::Concurrent
        } else {
            RoundMode::Sequential
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundMode::Concurrent => "concurrent",
            RoundMode::Sequential => "sequential",
        }
    }
}

impl std::fmt::Display for RoundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pure functions over the agent list
pub struct RoleProtocol;

impl RoleProtocol {
    /// Panelists in original list order.
    pub fn panelists(agents: &[AgentDefinition]) -> Vec<&AgentDefinition> {
        agents.iter().filter(|a| a.is_panelist()).collect()
    }

    /// The synthesizer, if one is defined. When several are defined the
    /// first one in list order wins.
    pub fn synthesizer(agents: &[AgentDefinition]) -> Option<&AgentDefinition> {
        agents.iter().find(|a| a.is_synthesizer())
    }

    pub fn is_concurrent_round(round: u32) -> bool {
        round == 1
    }
}
