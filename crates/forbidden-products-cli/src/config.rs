//! CLI settings.
//!
//! The user data directory is resolved with this precedence: `--data-dir`,
//! then `FP_USER_DATA_DIR` (a `.env` file is honoured), then the platform
//! data directory.

use std::fmt;
use std::path::PathBuf;

use forbidden_products_core::ConfigPaths;

/// Environment variable overriding the user data directory.
pub const DATA_DIR_ENV: &str = "FP_USER_DATA_DIR";

/// Where the user data directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirSource {
    Flag,
    Env,
    Platform,
}

impl fmt::Display for DataDirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataDirSource::Flag => write!(f, "--data-dir"),
            DataDirSource::Env => write!(f, "{DATA_DIR_ENV}"),
            DataDirSource::Platform => write!(f, "platform default"),
        }
    }
}

/// Resolved CLI settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: ConfigPaths,
    pub source: DataDirSource,
}

impl Settings {
    /// Resolve settings from the flag, the environment and the platform.
    pub fn load(data_dir: Option<PathBuf>) -> Self {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        if let Some(dir) = data_dir {
            return Self {
                paths: ConfigPaths::new(dir),
                source: DataDirSource::Flag,
            };
        }

        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self {
                paths: ConfigPaths::new(dir.trim()),
                source: DataDirSource::Env,
            },
            _ => Self {
                paths: ConfigPaths::default_location(),
                source: DataDirSource::Platform,
            },
        }
    }
}
