//! Configuration
//!
//! Read from `config.toml` under the platform config directory
//! (`~/.config/lorebook/config.toml` on Linux). A missing file means defaults,
//! and with no `owned_domain` nothing is ever deleted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::attachments::OwnedDomain;

/// Environment variable that overrides the storage credential
pub const TOKEN_ENV_VAR: &str = "LOREBOOK_STORAGE_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where attachments live and how to delete them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Host whose objects may be deleted, e.g. `abc.supabase.co`
    #[serde(default)]
    pub owned_domain: String,
    /// Delete-by-URL API endpoint
    #[serde(default)]
    pub delete_endpoint: Option<String>,
    /// Bearer credential for the delete endpoint
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// Per-request transport timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            owned_domain: String::new(),
            delete_endpoint: None,
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StorageConfig {
    pub fn owned_domain(&self) -> OwnedDomain {
        OwnedDomain::new(&self.owned_domain)
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lorebook").join("config.toml"))
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from the default location, then apply environment overrides
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_token_override(std::env::var(TOKEN_ENV_VAR).ok());
        Ok(config)
    }

    /// Replace the configured token when an override is present and non-empty
    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.storage.token = Some(token);
        }
    }
}
