//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod history;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoadError, ConfigLoader, FileConfig, FileDiscussionConfig, FileHistoryConfig,
    FileOutputConfig, FileProviderConfig, default_preset,
};
pub use history::{JsonlDiscussionRecorder, history_file_name};
pub use providers::{OpenRouterClient, OpenRouterProvider, ProviderCache};
