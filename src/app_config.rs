/// Demo application configuration
///
/// Read from `config.json` in the user's config directory:
/// - Linux: ~/.config/image-picker/config.json
/// - macOS: ~/Library/Application Support/image-picker/config.json
/// - Windows: %APPDATA%\image-picker\config.json
///
/// Every field is optional; a missing file means defaults.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::picker::constraints::{DEFAULT_MAX_SIZE_BYTES, MIB};
use crate::picker::UploadConstraints;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upload limit in MiB
    pub max_size_mib: u64,
    /// How long warning toasts stay up
    pub toast_seconds: u64,
    /// Already uploaded image to show on startup (path or file:// URL)
    pub initial_image: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_size_mib: DEFAULT_MAX_SIZE_BYTES / MIB,
            toast_seconds: 4,
            initial_image: None,
        }
    }
}

impl AppConfig {
    /// Load from the default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load from a specific file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Where the config file lives, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("image-picker");
        path.push("config.json");
        Some(path)
    }

    pub fn constraints(&self) -> UploadConstraints {
        UploadConstraints::with_max_size_mib(self.max_size_mib)
    }
}
