//! Presentation layer for roundtable
//!
//! This crate contains CLI definitions, the console renderer
//! and progress spinners.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::OutputConfig;
pub use output::console::{ConsoleRenderer, Rendered};
pub use progress::reporter::ProgressReporter;
