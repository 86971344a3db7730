//! Discussion parameters: engine runtime control.
//!
//! [`DiscussionParams`] groups the static parameters that control how
//! [`RunRoundtableUseCase`](crate::use_cases::run_roundtable::RunRoundtableUseCase)
//! drives a run. These are application-layer concerns, not domain policy:
//! the per-discussion `agent_timeout` of a
//! [`RoundtableConfig`](roundtable_domain::RoundtableConfig) overrides the
//! default timeout here.

use roundtable_domain::RoundtableConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wall-clock bound for a single agent invocation.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionParams {
    /// Timeout for each agent invocation when the config does not set one.
    pub agent_timeout: Duration,
    /// Capacity of the event channel between the engine and its consumer.
    pub event_buffer: usize,
}

impl Default for DiscussionParams {
    fn default() -> Self {
        Self {
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
            event_buffer: 16,
        }
    }
}

impl DiscussionParams {
    // ==================== Builder Methods ====================

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Timeout applying to `config`: its own `agent_timeout` if set,
    /// otherwise the default held here.
    pub fn timeout_for(&self, config: &RoundtableConfig) -> Duration {
        config
            .agent_timeout_duration()
            .unwrap_or(self.agent_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::AgentDefinition;

    fn config() -> RoundtableConfig {
        RoundtableConfig::new(
            vec![
                AgentDefinition::panelist("a", "A", "m"),
                AgentDefinition::synthesizer("s", "S", "m"),
            ],
            1,
        )
    }

    #[test]
    fn test_default() {
        let params = DiscussionParams::default();
        assert_eq!(params.agent_timeout, Duration::from_secs(120));
        assert_eq!(params.event_buffer, 16);
    }

    #[test]
    fn test_builder() {
        let params = DiscussionParams::default()
            .with_agent_timeout(Duration::from_secs(5))
            .with_event_buffer(1);
        assert_eq!(params.agent_timeout, Duration::from_secs(5));
        assert_eq!(params.event_buffer, 1);
    }

    #[test]
    fn test_config_timeout_overrides_default() {
        let params = DiscussionParams::default();
        assert_eq!(params.timeout_for(&config()), Duration::from_secs(120));
        assert_eq!(
            params.timeout_for(&config().with_agent_timeout(30)),
            Duration::from_secs(30)
        );
    }
}
