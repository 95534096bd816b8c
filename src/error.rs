use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to write config file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("glyph alphabet must not be empty")]
    EmptyAlphabet,
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("invalid color {0:?}, expected #rrggbb or #rgb")]
    Color(String),
}
