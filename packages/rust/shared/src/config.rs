//! Application configuration for fdrates.
//!
//! User config lives at `~/.fdrates/fdrates.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FdRatesError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "fdrates.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".fdrates";

// ---------------------------------------------------------------------------
// Config structs (matching fdrates.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Page fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Per-source URL overrides.
    #[serde(default)]
    pub sources: Vec<SourceOverride>,
}

/// `[database]` section — the explicit configuration handed to the
/// ingestion sink (no module-level credential state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the local database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "~/.fdrates/fdrates.db".into()
}

impl DatabaseConfig {
    /// Resolve the configured path, expanding a leading `~/`.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(rest) = self.path.strip_prefix("~/") {
            let home = dirs::home_dir()
                .ok_or_else(|| FdRatesError::config("could not determine home directory"))?;
            Ok(home.join(rest))
        } else {
            Ok(PathBuf::from(&self.path))
        }
    }
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total time to wait for a script-rendered page to become ready, in ms.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    /// Interval between readiness polls, in ms.
    #[serde(default = "default_ready_poll_ms")]
    pub ready_poll_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            ready_timeout_ms: default_ready_timeout_ms(),
            ready_poll_ms: default_ready_poll_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_ready_timeout_ms() -> u64 {
    15_000
}
fn default_ready_poll_ms() -> u64 {
    1_000
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn ready_poll(&self) -> Duration {
        Duration::from_millis(self.ready_poll_ms)
    }
}

/// `[[sources]]` entry — overrides the built-in URL for a named source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOverride {
    /// Source registry key, e.g. "kotak" or "sbi".
    pub name: String,
    /// URL to fetch instead of the built-in default.
    pub url: String,
}

impl AppConfig {
    /// Look up a configured URL override for a source.
    pub fn url_override(&self, source_name: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.name == source_name)
            .map(|s| s.url.as_str())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.fdrates/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FdRatesError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.fdrates/fdrates.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FdRatesError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FdRatesError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FdRatesError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FdRatesError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FdRatesError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
