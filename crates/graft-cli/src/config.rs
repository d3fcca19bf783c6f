//! Loading `AdapterConfig` from TOML.
//!
//! ```toml
//! ambiguity = "first_match"
//!
//! [cache]
//! policy = "lru"
//! capacity = 64
//! ```
//!
//! Missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use graft_runtime::AdapterConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub fn load(path: &Path) -> Result<AdapterConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(text: &str) -> Result<AdapterConfig, toml::de::Error> {
    toml::from_str(text)
}
