use anyhow::{Context, Result};
use log::debug;
use schemadelta::CompareOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = ".schemadelta";
const CONFIG_FILE: &str = "config.toml";

/// Settings that apply to one CLI run
pub struct RunContext {
    /// Config file the settings came from, if any
    pub config_path: Option<PathBuf>,
    /// Loaded configuration (defaults when no file was found)
    pub config: SchemadeltaConfig,
}

/// Configuration stored in .schemadelta/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemadeltaConfig {
    #[serde(default)]
    pub compare: CompareOptions,
    #[serde(default)]
    pub loader: LoaderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Deadline for loading both snapshots
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}

impl RunContext {
    /// Load the explicit config file, or discover one from the current directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path.to_path_buf()),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_from(&current_dir)
            }
        }
    }

    /// Walk up from `start` looking for .schemadelta/config.toml
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::from_file(candidate);
            }

            if !current.pop() {
                debug!("No {CONFIG_DIR}/{CONFIG_FILE} found above {}", start.display());
                return Ok(Self {
                    config_path: None,
                    config: SchemadeltaConfig::default(),
                });
            }
        }
    }

    fn from_file(path: PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SchemadeltaConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Loader deadline, with an optional command-line override in seconds
    pub fn timeout(&self, override_secs: Option<u64>) -> Duration {
        Duration::from_secs(override_secs.unwrap_or(self.config.loader.timeout_secs))
    }
}
