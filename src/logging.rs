use crate::{config::LogConfig, error::ConfigError};

use std::{
    fs::{self, File, OpenOptions},
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

fn fallback_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn open_log_file(path: &Path) -> Result<File, ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::LogFile {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// level. Without a log file, events are dropped so they never draw over
/// the UI. A configured file that cannot be opened is an error.
pub fn init(config: &LogConfig) -> Result<(), ConfigError> {
    let level = fallback_level(&config.level);
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let file = config.file.as_deref().map(open_log_file).transpose()?;

    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(make_filter())
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(make_filter())
                .with_writer(std::io::sink)
                .try_init();
        }
    }

    Ok(())
}
