//! Provider-neutral chat messages.

use serde::{Deserialize, Serialize};

/// Role in a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A chat message with an optional cache hint.
///
/// `cache` marks the message as the end of a stable prefix that a
/// caching-capable provider may reuse across calls. Providers without prefix
/// caching ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cache: bool,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            cache: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            cache: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            cache: false,
        }
    }

    pub fn cached(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_default_to_uncached() {
        assert!(!ChatMessage::system("s").cache);
        assert!(!ChatMessage::user("u").cache);
        assert_eq!(ChatMessage::assistant("a").role, MessageRole::Assistant);
        assert!(ChatMessage::user("u").cached(true).cache);
    }

    #[test]
    fn test_cache_flag_omitted_when_false() {
        let json = serde_json::to_value(ChatMessage::user("u")).unwrap();
        assert!(json.get("cache").is_none());
        assert_eq!(json["role"], "user");

        let json = serde_json::to_value(ChatMessage::system("s").cached(true)).unwrap();
        assert_eq!(json["cache"], true);
    }
}
