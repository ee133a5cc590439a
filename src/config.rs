use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::session::SessionConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a number (got '{raw}')")]
    NotANumber { field: &'static str, raw: String },
    #[error("at least one sequence is required")]
    ZeroSequences,
    #[error("at most {max} sequences are allowed (got {got})")]
    TooManySequences { max: usize, got: usize },
    #[error("a sequence needs at least one digit")]
    ZeroDigits,
    #[error("at most {max} digits per sequence are allowed (got {got})")]
    TooManyDigits { max: usize, got: usize },
    #[error("flash duration must be between 0 and 3600 seconds (got {0})")]
    InvalidDuration(f64),
    #[error("failed to read config {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Launch defaults, read from a JSON file and overridden by CLI flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sequence_count: usize,
    pub digits_per_sequence: usize,
    pub secs_per_flash: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sequence_count: 5,
            digits_per_sequence: 2,
            secs_per_flash: 2.0,
        }
    }
}

impl Config {
    pub fn session(&self) -> Result<SessionConfig, ConfigError> {
        SessionConfig::new(
            self.sequence_count,
            self.digits_per_sequence,
            self.secs_per_flash,
        )
    }
}

pub trait ConfigStore {
    fn load(&self) -> Result<Config, ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "muisti") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("muisti_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// A missing file yields the defaults; anything else unreadable is an error
    fn load(&self) -> Result<Config, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice::<Config>(&bytes).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
