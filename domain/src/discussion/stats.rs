//! End-of-run statistics.

use super::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// Summary produced once, at the end of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionStats {
    pub total_rounds: u32,
    pub total_agents: u32,
    pub total_tokens_estimate: u64,
    pub duration_ms: u64,
}

impl DiscussionStats {
    /// Build stats from the final transcript and synthesis text.
    ///
    /// The token estimate covers every panelist response plus the synthesis.
    pub fn compute(
        total_rounds: u32,
        total_agents: usize,
        transcript: &Transcript,
        synthesis: &str,
        duration_ms: u64,
    ) -> Self {
        let total_tokens_estimate = transcript
            .iter()
            .map(|e| estimate_tokens(&e.response))
            .sum::<u64>()
            + estimate_tokens(synthesis);

        Self {
            total_rounds,
            total_agents: u32::try_from(total_agents).unwrap_or(u32::MAX),
            total_tokens_estimate,
            duration_ms,
        }
    }
}

/// Crude token estimate: `ceil(chars / 3.5)`.
///
/// Computed in integers as `ceil(2 * chars / 7)`.
pub fn estimate_tokens(text: &str) -> u64 {
    let chars = text.chars().count() as u64;
    (chars * 2).div_ceil(7)
}
