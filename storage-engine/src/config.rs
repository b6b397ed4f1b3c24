// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storage_types::MountByType;
use thiserror::Error;

/// Environment variable replacing `default_mount_by`
pub const DEFAULT_MOUNT_BY_ENV: &str = "STORAGE_ENGINE_DEFAULT_MOUNT_BY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    /// Emit the `//` provenance header in DOT output
    pub header: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { header: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub default_mount_by: MountByType,
    pub log_level: LoggingLevel,
    pub graph: GraphConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config file and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&text)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `STORAGE_ENGINE_DEFAULT_MOUNT_BY`; invalid values are ignored
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(DEFAULT_MOUNT_BY_ENV) {
            self.apply_mount_by_override(&value);
        }
    }

    fn apply_mount_by_override(&mut self, value: &str) {
        match MountByType::parse(value) {
            Some(mount_by) => self.default_mount_by = mount_by,
            None => tracing::warn!("ignoring invalid {DEFAULT_MOUNT_BY_ENV}={value:?}"),
        }
    }
}
