//! Layered settings
//!
//! Built-in defaults, then an optional TOML file (`crossblog.toml` or
//! `--config`), then `CROSSBLOG__SECTION__KEY` environment variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigBuilder, Environment, File};
use crossblog_core::errors::{ExError, ExErrorKind};
use serde::Deserialize;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "crossblog.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: Backend,
    pub sqlite_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub profile: String,
}

/// Article storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Sqlite,
}

impl FromStr for Backend {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(ExError::new(ExErrorKind::Config)
                .with_op("parse_backend")
                .with_message(format!(
                    "unknown storage backend '{}' (expected memory or sqlite)",
                    other
                ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => f.write_str("memory"),
            Backend::Sqlite => f.write_str("sqlite"),
        }
    }
}

impl Settings {
    /// Load settings from every layer
    ///
    /// An explicit `config_path` must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ExError> {
        let builder = with_file(defaults()?, config_path).add_source(
            Environment::with_prefix("CROSSBLOG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        build(builder)
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ExError> {
    Config::builder()
        .set_default("server.host", "127.0.0.1")
        .and_then(|b| b.set_default("server.port", 8080_i64))
        .and_then(|b| b.set_default("storage.backend", "memory"))
        .and_then(|b| b.set_default("storage.sqlite_path", ".crossblog/crossblog.db"))
        .and_then(|b| b.set_default("logging.profile", "development"))
        .map_err(config_error)
}

fn with_file(
    builder: ConfigBuilder<config::builder::DefaultState>,
    config_path: Option<&Path>,
) -> ConfigBuilder<config::builder::DefaultState> {
    match config_path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    }
}

fn build(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Settings, ExError> {
    builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(config_error)
}

fn config_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_settings")
        .with_message(err.to_string())
}
