//! Load the faction catalog from a JSON file.

use super::Catalog;
use crate::config::MAX_CATALOG_BYTES;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: usize },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse catalog JSON. The top level is an object of faction name to faction.
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    if content.len() > MAX_CATALOG_BYTES {
        return Err(CatalogError::TooLarge {
            size: content.len() as u64,
            max: MAX_CATALOG_BYTES,
        });
    }
    let catalog: Catalog = serde_json::from_str(content)?;
    Ok(catalog)
}

/// Read and parse the catalog at `path`. Called once per session.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > MAX_CATALOG_BYTES as u64 {
        return Err(CatalogError::TooLarge {
            size,
            max: MAX_CATALOG_BYTES,
        });
    }
    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let catalog = parse_catalog(&content)?;
    tracing::debug!(
        "loaded catalog {} with {} faction(s)",
        path.display(),
        catalog.len()
    );
    Ok(catalog)
}
