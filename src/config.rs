//! Command configuration: where the Provision backend lives.
//!
//! Sources, highest precedence first:
//! - `--backend` flag
//! - `PVCTL_BACKEND` environment variable, then the bare `BACKEND` read by
//!   older installs
//! - `backend` key of the config file (`--config <path>` or `~/.pvctl.yaml`)
//! - [`DEFAULT_BACKEND`]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND: &str = "http://api-provision:8070";
pub const BACKEND_ENV: &str = "PVCTL_BACKEND";
pub const LEGACY_BACKEND_ENV: &str = "BACKEND";
const CONFIG_FILE: &str = ".pvctl.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Provision service, without a trailing slash.
    pub backend: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
        }
    }
}

impl Config {
    /// Load the config file and apply environment and flag overrides.
    pub fn resolve(config_file: Option<&Path>, backend_flag: Option<String>) -> Result<Self> {
        let mut config = Self::load(config_file)?;
        let env_backend = backend_from_env(|name| std::env::var(name).ok());
        config.apply_overrides(env_backend, backend_flag);
        Ok(config)
    }

    /// Read an explicit config file, which must exist, or the default one if
    /// present. Falls back to defaults when neither applies.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::info!("Using config file: {}", path.display());
        Ok(config)
    }

    fn apply_overrides(&mut self, env_backend: Option<String>, backend_flag: Option<String>) {
        if let Some(backend) = backend_flag
            .or(env_backend)
            .filter(|b| !b.trim().is_empty())
        {
            self.backend = backend;
        }
    }
}

/// First non-blank of [`BACKEND_ENV`] and [`LEGACY_BACKEND_ENV`].
fn backend_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    [BACKEND_ENV, LEGACY_BACKEND_ENV]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}
