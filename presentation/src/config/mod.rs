//! Presentation-level configuration
//!
//! Resolved output settings after CLI flags are merged over the config file.

use roundtable_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show spinners while agents think
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// CLI format wins over the file format; `quiet` disables progress.
    pub fn resolve(
        cli_format: Option<crate::cli::commands::OutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format
            .map(OutputFormat::from)
            .or(file_format)
            .unwrap_or_default();
        Self {
            format,
            color,
            // Spinners would interleave with machine-readable output
            show_progress: !quiet && format != OutputFormat::Json,
        }
    }
}
