//! Configuration file loading for roundtable
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/roundtable/config.toml`
//! 4. `ROUNDTABLE_*` environment variables
//! 5. Default values
//!
//! Roundtable presets (the panel itself) live in separate TOML files loaded
//! by [`ConfigLoader::load_preset`].

mod file_config;
mod loader;
mod preset;

pub use file_config::{
    FileConfig, FileDiscussionConfig, FileHistoryConfig, FileOutputConfig, FileProviderConfig,
};
pub use loader::{ConfigLoadError, ConfigLoader};
pub use preset::default_preset;
