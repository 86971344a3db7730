//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{CompositeRecorder, RunRoundtableInput, RunRoundtableUseCase};
use roundtable_domain::{RoundtableConfig, RoundtableOutcome};
use roundtable_infrastructure::{
    ConfigLoader, FileConfig, JsonlDiscussionRecorder, OpenRouterClient, ProviderCache,
    default_preset,
};
use roundtable_presentation::{Cli, ConsoleRenderer, OutputConfig, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let Some(topic) = cli.topic.clone() else {
        bail!("A topic is required");
    };

    let config = build_roundtable_config(&cli, &file_config)?;
    let output = OutputConfig::resolve(
        cli.output,
        file_config.output.format,
        file_config.output.color,
        cli.quiet,
    );
    if !output.color {
        colored::control::set_override(false);
    }

    info!(
        "Starting roundtable with {} agents, {} rounds",
        config.agents.len(),
        config.max_rounds
    );

    // === Dependency Injection ===
    let provider = &file_config.provider;
    let api_key = provider.resolve_api_key();
    if api_key.is_none() {
        warn!(
            "No API key found in config or ${}; requests may be rejected",
            provider.api_key_env
        );
    }
    let client = OpenRouterClient::new(api_key, provider.base_url.clone())
        .with_max_retries(provider.max_retries)
        .with_request_timeout(Duration::from_secs(provider.request_timeout_seconds));
    let resolver = Arc::new(ProviderCache::openrouter(client));

    let use_case = RunRoundtableUseCase::new(resolver)
        .with_params(file_config.discussion.discussion_params());

    // === Recorders ===
    let progress = ProgressReporter::new();
    let console = ConsoleRenderer::new(output.format);
    let history = open_history(&cli, &file_config, &topic);

    let mut recorder = CompositeRecorder::new(Vec::new());
    if output.show_progress {
        recorder.push(&progress);
    }
    recorder.push(&console);
    if let Some(history) = &history {
        recorder.push(history);
    }

    let outcome = use_case
        .execute_with_recorder(RunRoundtableInput::new(topic, config), &recorder)
        .await;

    if let Some(history) = &history {
        info!("Discussion recorded to {}", history.path().display());
    }

    match outcome {
        RoundtableOutcome::Completed { .. } => Ok(()),
        RoundtableOutcome::Failed { error } => bail!("Roundtable failed: {}", error),
        RoundtableOutcome::Incomplete => bail!("Roundtable ended before finishing"),
    }
}

/// Console logging to stderr, plus daily rolling files when `log_dir` is set.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "roundtable.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

/// Preset (or the built-in panel), then file defaults, then CLI overrides.
fn build_roundtable_config(cli: &Cli, file_config: &FileConfig) -> Result<RoundtableConfig> {
    let mut config = match &cli.preset {
        Some(path) => ConfigLoader::load_preset(path)
            .with_context(|| format!("Failed to load preset {}", path.display()))?,
        None => default_preset().with_max_rounds(file_config.discussion.max_rounds),
    };

    if let Some(rounds) = cli.rounds {
        config = config.with_max_rounds(rounds);
    }
    if let Some(seconds) = cli.timeout {
        config = config.with_agent_timeout(seconds);
    }

    ConfigLoader::check("command line", config.validate())?;
    Ok(config)
}

/// `--record` wins; otherwise the history directory when history is enabled.
fn open_history(cli: &Cli, file_config: &FileConfig, topic: &str) -> Option<JsonlDiscussionRecorder> {
    if let Some(path) = &cli.record {
        return JsonlDiscussionRecorder::new(path);
    }
    if !file_config.history.enabled {
        return None;
    }
    let dir = file_config.history.resolved_dir()?;
    JsonlDiscussionRecorder::in_dir(dir, topic)
}
