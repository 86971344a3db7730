//! History configuration from TOML (`[history]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw history configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHistoryConfig {
    /// Record every discussion as JSONL
    pub enabled: bool,
    /// Directory for history files (default: `<data dir>/roundtable/history`)
    pub dir: Option<PathBuf>,
}

impl FileHistoryConfig {
    /// Configured directory, or the platform data directory.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("roundtable").join("history")))
    }
}
