use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prompt printed before each read.
    pub prompt: String,
    /// Where line history is persisted between sessions; unset disables
    /// persistence.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "clam> ".into(),
            history_file: None,
        }
    }
}

impl Config {
    /// Loads the config from `$CLAM_CONFIG`, falling back to
    /// `~/.config/clam.toml`. A missing file is not an error; a file
    /// that exists but does not parse is.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("CLAM_CONFIG") {
        return Some(PathBuf::from(path));
    }

    env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/clam.toml"))
}
