//! Configuration for the nifi-api client.
//!
//! One TOML file plus `NIFI_`-prefixed environment overrides, layered with
//! figment, translated into the `ClientConfig` and `TransportConfig` the
//! API client takes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use nifi_api::{ClientConfig, Scheme, TlsMode, TransportConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Where the flow-management API lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Host and optional port (e.g. "localhost:8080").
    #[serde(default = "default_host")]
    pub host: String,

    /// API path prefix (e.g. "nifi-api").
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// "http" or "https".
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_path: default_api_path(),
            scheme: default_scheme(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_host() -> String {
    "localhost:8080".into()
}
fn default_api_path() -> String {
    "nifi-api".into()
}
fn default_scheme() -> String {
    "http".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        self.parsed_scheme()?;
        Ok(())
    }

    fn parsed_scheme(&self) -> Result<Scheme, ConfigError> {
        match self.scheme.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(ConfigError::Validation {
                field: "scheme".into(),
                reason: format!("expected 'http' or 'https', got '{other}'"),
            }),
        }
    }

    /// Endpoint config for `nifi_api::Client`.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.validate()?;
        Ok(ClientConfig {
            host: self.host.trim().to_owned(),
            api_path: self.api_path.clone(),
            scheme: self.parsed_scheme()?,
        })
    }

    /// Transport settings for building the `reqwest::Client`.
    pub fn to_transport_config(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "nifi-rs", "nifi-rs").map_or_else(
        || PathBuf::from(".").join("nifi.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Defaults, then the TOML file at `path` (if present), then `NIFI_*` env vars.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NIFI_"))
}

/// Load config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.validate()?;
    Ok(config)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
