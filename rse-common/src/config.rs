//! Configuration loading and config file resolution
//!
//! Bootstrap configuration comes from a single TOML file. Every field has a
//! compiled default so a missing file is never fatal: the service starts
//! with defaults and logs a warning.
//!
//! # Config File Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `RSE_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/rse/rse-ui.toml`)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RSE_CONFIG";

/// Bootstrap configuration loaded from TOML
///
/// Changes require a restart, except `classifier.token` which the settings
/// API writes back while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Dataset source: `http(s)://` URL or local path
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Header name of the column holding the review text
    #[serde(default = "default_text_column")]
    pub text_column: String,

    /// Dataset fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which classifier implementation backs the capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierBackend {
    /// Local word-list scorer, needs no credential
    #[default]
    Lexicon,
    /// Remote text-classification inference endpoint
    InferenceApi,
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub backend: ClassifierBackend,

    /// Inference endpoint URL (required for `inference_api`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-call classification timeout in seconds
    #[serde(default = "default_classify_timeout_secs")]
    pub timeout_secs: u64,

    /// Saved credential for the inference endpoint (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Telemetry sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Logging endpoint URL; telemetry is disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Delivery timeout in seconds
    #[serde(default = "default_telemetry_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    5780
}

fn default_dataset() -> String {
    "data/reviews_test.tsv".to_string()
}

fn default_text_column() -> String {
    "text".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_classify_timeout_secs() -> u64 {
    30
}

fn default_telemetry_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            dataset: default_dataset(),
            text_column: default_text_column(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            classifier: ClassifierConfig::default(),
            telemetry: TelemetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::default(),
            endpoint: None,
            timeout_secs: default_classify_timeout_secs(),
            token: None,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_telemetry_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TomlConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TelemetryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve which config file to use
///
/// The path does not have to exist; see [`load_toml_config`].
pub fn resolve_config_path(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    default_config_path()
}

/// Platform default config file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("rse").join("rse-ui.toml"))
        .unwrap_or_else(|| PathBuf::from("rse-ui.toml"))
}

/// Load bootstrap configuration
///
/// A missing file yields compiled defaults with a warning. An unreadable or
/// unparsable file is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write configuration atomically (temp file + rename)
///
/// On Unix the file is restricted to 0600.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}
