//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use roundtable_domain::{ConfigIssue, RoundtableConfig, Severity};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const PROJECT_CONFIG_FILES: [&str; 2] = ["roundtable.toml", ".roundtable.toml"];

/// Errors from loading application config or a preset
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Failed to read preset {}: {source}", .path.display())]
    ReadPreset {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse preset {}: {source}", .path.display())]
    ParsePreset {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {origin}:\n{}", format_issues(.issues))]
    Invalid {
        origin: String,
        issues: Vec<ConfigIssue>,
    },
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./roundtable.toml` or `./.roundtable.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/roundtable/config.toml`
    /// 4. `ROUNDTABLE_*` environment variables (`__` separates sections)
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigLoadError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed("ROUNDTABLE_").split("__"));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Merging global config {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            debug!("Merging project config {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            debug!("Merging explicit config {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        let config: FileConfig = figment.extract().map_err(Box::new)?;
        Self::check("configuration", config.validate())?;
        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Load and validate a roundtable preset.
    ///
    /// Warnings are logged; any error-severity issue rejects the preset.
    pub fn load_preset(path: impl AsRef<Path>) -> Result<RoundtableConfig, ConfigLoadError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigLoadError::ReadPreset {
                path: path.to_path_buf(),
                source,
            })?;
        let preset: RoundtableConfig =
            toml::from_str(&content).map_err(|source| ConfigLoadError::ParsePreset {
                path: path.to_path_buf(),
                source,
            })?;

        Self::check(&path.display().to_string(), preset.validate())?;
        Ok(preset)
    }

    /// Log warnings and reject error-severity issues.
    pub fn check(origin: &str, issues: Vec<ConfigIssue>) -> Result<(), ConfigLoadError> {
        for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
            warn!("{}: {}", origin, issue.message);
        }
        if RoundtableConfig::has_errors(&issues) {
            return Err(ConfigLoadError::Invalid {
                origin: origin.to_string(),
                issues: issues
                    .into_iter()
                    .filter(|i| i.severity == Severity::Error)
                    .collect(),
            });
        }
        Ok(())
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/roundtable/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("roundtable").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./roundtable.toml or ./.roundtable.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Env:     ROUNDTABLE_* (e.g. ROUNDTABLE_DISCUSSION__MAX_ROUNDS)");
        println!("  [     ] Default: built-in defaults");
    }
}
