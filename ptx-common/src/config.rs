//! Bootstrap configuration loading
//!
//! Configuration sources, highest priority first:
//! 1. Command-line arguments / environment variables (handled by each binary via clap)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! A missing TOML file is not an error: the module logs a warning and starts
//! with defaults. A TOML file that exists but does not parse IS an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database (provisioning service only)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub provisioning: ProvisioningSection,

    #[serde(default)]
    pub upload: UploadSection,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            bind_address: default_bind_address(),
            port: default_port(),
            logging: LoggingConfig::default(),
            provisioning: ProvisioningSection::default(),
            upload: UploadSection::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[provisioning]` section
///
/// Every value can be overridden from the environment; see the
/// provisioning service's command-line definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisioningSection {
    pub provider: Option<String>,
    pub identity_domain: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub shared_secret: Option<String>,
}

/// `[upload]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadSection {
    /// Country used to format phone numbers (ISO 3166 alpha-2)
    pub phone_country: Option<String>,
    /// Optional timeout for the storage PUT; unset means no timeout
    pub transfer_timeout_secs: Option<u64>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration for a module
    ///
    /// Uses `explicit` when given, otherwise the platform default path
    /// (`<config dir>/ptx/<module>.toml`). Missing files fall back to defaults.
    pub fn load(module_name: &str, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path(module_name) {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            warn!("Config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Default configuration file path for the platform
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ptx").join(format!("{}.toml", module_name)))
}

/// OS-dependent default database location
///
/// `<local data dir>/ptx/ptx.db`, or `./ptx_data/ptx.db` when the platform
/// has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("ptx"))
        .unwrap_or_else(|| PathBuf::from("./ptx_data"))
        .join("ptx.db")
}

/// Pick the first non-empty value, in priority order
pub fn first_non_empty<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
