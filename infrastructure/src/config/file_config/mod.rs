//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod discussion;
mod history;
mod output;
mod provider;

pub use discussion::FileDiscussionConfig;
pub use history::FileHistoryConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;

use roundtable_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Discussion engine defaults
    pub discussion: FileDiscussionConfig,
    /// Model provider connection
    pub provider: FileProviderConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Discussion history recording
    pub history: FileHistoryConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.discussion.validate());
        issues.extend(self.provider.validate());
        issues
    }
}
