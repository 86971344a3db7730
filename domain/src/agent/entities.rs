//! Agent domain entities

use serde::{Deserialize, Serialize};

/// Role an agent plays in a roundtable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Speaks once per round, in configured order
    #[default]
    Panelist,
    /// Accepted in configuration but never invoked by the engine
    Moderator,
    /// Produces the final answer from the full transcript
    Synthesizer,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Panelist => "panelist",
            AgentRole::Moderator => "moderator",
            AgentRole::Synthesizer => "synthesizer",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "panelist" | "panel" => Ok(AgentRole::Panelist),
            "moderator" => Ok(AgentRole::Moderator),
            "synthesizer" | "synthesiser" => Ok(AgentRole::Synthesizer),
            _ => Err(format!("Invalid AgentRole: {}", s)),
        }
    }
}

/// A participant in the discussion, as supplied by configuration.
///
/// Immutable once a discussion starts. `system_prompt` is a template that may
/// reference `{{topic}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: AgentRole,
    pub model: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl AgentDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: AgentRole,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            model: model.into(),
            system_prompt: String::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn panelist(
        id: impl Into<String>,
        name: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(id, name, AgentRole::Panelist, model)
    }

    pub fn synthesizer(
        id: impl Into<String>,
        name: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(id, name, AgentRole::Synthesizer, model)
    }

    // ==================== Builder Methods ====================

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn is_panelist(&self) -> bool {
        self.role == AgentRole::Panelist
    }

    pub fn is_synthesizer(&self) -> bool {
        self.role == AgentRole::Synthesizer
    }

    /// Compact description used in the `roundtable_start` event.
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
            model: self.model.clone(),
        }
    }
}

/// Public view of an agent carried by events (no prompt, no sampling options)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub role: AgentRole,
    pub model: String,
}
