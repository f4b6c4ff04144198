//! Configuration management infrastructure.
//!
//! The trust service is configured through a TOML file holding the policy
//! root location, an optional folder of additionally trusted certificates,
//! HTTP settings for trust-list retrieval and the reload interval.

use crate::infra::error::{TrustError, TrustResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT_MILLIS: u64 = 10_000;
pub const DEFAULT_READ_TIMEOUT_MILLIS: u64 = 10_000;
pub const DEFAULT_RELOAD_INTERVAL_SECONDS: u64 = 600;

/// Trust service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfiguration {
    /// Policy root certificate (PEM or DER).
    pub policy_root: Option<PathBuf>,

    /// Folder of `.cer`/`.crt` files trusted in addition to the trust list.
    pub trusted_folder: Option<PathBuf>,

    /// Interval the external scheduler should use between reloads.
    pub reload_interval_seconds: u64,

    pub http: HttpSettings,
}

/// HTTP settings for trust-list retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub connect_timeout_millis: u64,
    pub read_timeout_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxySettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for TrustConfiguration {
    fn default() -> Self {
        Self {
            policy_root: None,
            trusted_folder: None,
            reload_interval_seconds: DEFAULT_RELOAD_INTERVAL_SECONDS,
            http: HttpSettings::default(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_millis: DEFAULT_CONNECT_TIMEOUT_MILLIS,
            read_timeout_millis: DEFAULT_READ_TIMEOUT_MILLIS,
            proxy: None,
        }
    }
}

impl TrustConfiguration {
    #[must_use]
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_seconds)
    }

    /// Check value ranges. Paths are not required to exist yet.
    pub fn validate(&self) -> TrustResult<()> {
        if self.http.connect_timeout_millis == 0 {
            return Err(TrustError::ConfigurationError(
                "http.connect_timeout_millis must be greater than 0".to_string(),
            ));
        }
        if self.http.read_timeout_millis == 0 {
            return Err(TrustError::ConfigurationError(
                "http.read_timeout_millis must be greater than 0".to_string(),
            ));
        }
        if self.reload_interval_seconds == 0 {
            return Err(TrustError::ConfigurationError(
                "reload_interval_seconds must be greater than 0".to_string(),
            ));
        }
        if let Some(proxy) = &self.http.proxy {
            if proxy.host.trim().is_empty() {
                return Err(TrustError::ConfigurationError(
                    "http.proxy.host must not be empty".to_string(),
                ));
            }
            if proxy.port == 0 {
                return Err(TrustError::ConfigurationError(
                    "http.proxy.port must be greater than 0".to_string(),
                ));
            }
            if proxy.password.is_some() && proxy.user_name.is_none() {
                return Err(TrustError::ConfigurationError(
                    "http.proxy.password given without user_name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    pub fn new() -> TrustResult<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> TrustResult<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("sigval-trust").join("config.toml"))
        } else {
            Ok(PathBuf::from("sigval-trust-config.toml"))
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default(&self) -> TrustResult<TrustConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = TrustConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    pub fn load(&self) -> TrustResult<TrustConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            TrustError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: TrustConfiguration = toml::from_str(&content).map_err(|e| {
            TrustError::ConfigurationError(format!("Failed to parse config file: {e}"))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &TrustConfiguration) -> TrustResult<()> {
        log::info!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TrustError::ConfigurationError(format!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            TrustError::ConfigurationError(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            TrustError::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        log::debug!("Configuration saved");
        Ok(())
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Export configuration as a portable format
    pub fn export_config(&self, format: ExportFormat) -> TrustResult<String> {
        export(&self.load()?, format)
    }

    /// Import configuration from a string and persist it.
    pub fn import_config(&self, content: &str, format: ExportFormat) -> TrustResult<()> {
        let config: TrustConfiguration = match format {
            ExportFormat::Toml => toml::from_str(content).map_err(|e| {
                TrustError::ConfigurationError(format!("TOML import failed: {e}"))
            })?,
            ExportFormat::Json => serde_json::from_str(content).map_err(|e| {
                TrustError::ConfigurationError(format!("JSON import failed: {e}"))
            })?,
            ExportFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                TrustError::ConfigurationError(format!("YAML import failed: {e}"))
            })?,
        };

        config.validate()?;
        self.save(&config)
    }
}

/// Serialize `config` in the requested format.
pub fn export(config: &TrustConfiguration, format: ExportFormat) -> TrustResult<String> {
    match format {
        ExportFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| TrustError::ConfigurationError(format!("TOML export failed: {e}"))),
        ExportFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| TrustError::ConfigurationError(format!("JSON export failed: {e}"))),
        ExportFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| TrustError::ConfigurationError(format!("YAML export failed: {e}"))),
    }
}

/// Configuration export/import formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Toml,
    Json,
    Yaml,
}

impl std::str::FromStr for ExportFormat {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(TrustError::InvalidInput(format!(
                "Unknown export format: {other}"
            ))),
        }
    }
}
