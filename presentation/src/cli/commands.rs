//! CLI command definitions

use clap::{Parser, ValueEnum};
use roundtable_domain::MAX_ROUNDS_LIMIT;
use std::path::PathBuf;

/// Output format for roundtable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round and agent, streamed, then the synthesis
    Full,
    /// Only the final answer
    Answer,
    /// One JSON event per line
    Json,
}

impl From<OutputFormat> for roundtable_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => roundtable_domain::OutputFormat::Full,
            OutputFormat::Answer => roundtable_domain::OutputFormat::Answer,
            OutputFormat::Json => roundtable_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Roundtable - a panel of LLMs discusses a topic over several rounds")]
#[command(long_about = r#"
Roundtable puts a panel of LLM agents around a table to discuss a topic.

The discussion runs in rounds:
1. Round 1: every panelist answers the topic independently, in parallel
2. Rounds 2..N: panelists take turns, each seeing everything said so far
3. Synthesis: a synthesizer agent reads the transcript and gives the final answer

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./roundtable.toml      Project-level config
3. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "Should we rewrite the billing service in Rust?"
  roundtable --preset panel.toml --rounds 2 "Monorepo or polyrepo?"
  roundtable -o answer "Best way to version a public API?"
"#)]
pub struct Cli {
    /// The topic for discussion
    #[arg(required_unless_present = "show_config")]
    pub topic: Option<String>,

    /// Roundtable preset (TOML file describing the panel)
    #[arg(short, long, value_name = "PATH")]
    pub preset: Option<PathBuf>,

    /// Number of discussion rounds (overrides preset and config)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_ROUNDS_LIMIT as i64))]
    pub rounds: Option<u32>,

    /// Per-agent timeout in seconds (overrides preset and config)
    #[arg(short, long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Record the discussion as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Also write logs to daily rolling files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
