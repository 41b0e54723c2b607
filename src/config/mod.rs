//! Configuration loading and defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum size in bytes accepted for a catalog file.
pub const MAX_CATALOG_BYTES: usize = 4 * 1024 * 1024;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "data/factions.json";

/// Base URL that list links are built on when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Quiet period before a burst of list edits is mirrored into the URL.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuilderConfig {
    /// Path to the faction catalog JSON.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Page the `faction` / `army` query parameters are attached to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Debounce window for location writes, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            base_url: default_base_url(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl BuilderConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = BuilderConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, BuilderConfig::default());
        assert_eq!(cfg.debounce().as_millis(), 500);
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = BuilderConfig::from_toml_str(
            "catalog_path = \"cat.json\"\ndebounce_ms = 50\n",
        )
        .unwrap();
        assert_eq!(cfg.catalog_path, PathBuf::from("cat.json"));
        assert_eq!(cfg.debounce_ms, 50);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BuilderConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
