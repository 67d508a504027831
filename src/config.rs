//! Whisperer configuration.
//!
//! The config file is found through a chain:
//!
//! 1. `--config <path>`: explicit per-invocation override
//! 2. `WHISPERER_CONFIG` env var: process/session level
//! 3. `~/.whisperer/config.toml`: global default
//!
//! Every field has a default, so a missing default file is not an error.
//! A file named explicitly (flag or env var) must exist.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use jiff::SignedDuration;
use serde::Deserialize;

use crate::clock::Timing;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Whisperer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// How long the assistant "thinks" before replying.
    pub thinking_delay_ms: u64,

    /// How long a deployment takes.
    pub deploy_delay_ms: u64,

    /// Log level used when `WHISPERER_LOG` is unset (e.g. "warn", "debug").
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thinking_delay_ms: 1500,
            deploy_delay_ms: 2500,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load config through the resolution chain.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Explicit --config flag.
        if let Some(path) = explicit {
            return Self::load_from(path, true);
        }

        // 2. WHISPERER_CONFIG environment variable.
        if let Ok(path) = env::var("WHISPERER_CONFIG")
            && !path.is_empty()
        {
            return Self::load_from(Path::new(&path), true);
        }

        // 3. ~/.whisperer/config.toml.
        match Self::default_path() {
            Some(path) => Self::load_from(&path, false),
            None => Ok(Self::default()),
        }
    }

    /// Read and parse one file. A missing file yields defaults unless `required`.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if required {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The default config file path: `~/.whisperer/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".whisperer").join("config.toml"))
    }

    /// Simulated latencies for a session.
    pub fn timing(&self) -> Timing {
        Timing {
            thinking: millis(self.thinking_delay_ms),
            deploy: millis(self.deploy_delay_ms),
        }
    }
}

fn millis(ms: u64) -> SignedDuration {
    SignedDuration::from_millis(i64::try_from(ms).unwrap_or(i64::MAX))
}
