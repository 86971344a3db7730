//! Model family detection for model identifier strings.
//!
//! Agents reference models by free-form identifiers such as
//! `anthropic/claude-sonnet-4.5` or `openai/gpt-5.2`. The engine never
//! interprets them beyond this module: the only decision taken on a model id
//! is whether its provider family supports prefix-based prompt caching.

/// Provider family a model identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Anthropic,
    OpenAi,
    Google,
    Other,
}

impl ModelFamily {
    /// Detect the family from a model identifier (case-insensitive prefix match).
    pub fn detect(model: &str) -> Self {
        let model = model.trim().to_ascii_lowercase();
        if model.starts_with("anthropic/") || model.starts_with("claude") {
            ModelFamily::Anthropic
        } else if model.starts_with("openai/")
            || model.starts_with("gpt")
            || model.starts_with("o1")
            || model.starts_with("o3")
        {
            ModelFamily::OpenAi
        } else if model.starts_with("google/") || model.starts_with("gemini") {
            ModelFamily::Google
        } else {
            ModelFamily::Other
        }
    }

    /// Whether requests for this family may carry cache hints on stable
    /// message prefixes.
    pub fn supports_prefix_caching(&self) -> bool {
        matches!(self, ModelFamily::Anthropic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Anthropic => "anthropic",
            ModelFamily::OpenAi => "openai",
            ModelFamily::Google => "google",
            ModelFamily::Other => "other",
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shorthand for `ModelFamily::detect(model).supports_prefix_caching()`.
pub fn supports_prefix_caching(model: &str) -> bool {
    ModelFamily::detect(model).supports_prefix_caching()
}
