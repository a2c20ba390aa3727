use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::crawler::SiteMap;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// `YYYY-MM-DD HH-MM-SS_sitemap.json` in the current directory
pub fn default_output_path(now: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("{}_sitemap.json", now.format("%Y-%m-%d %H-%M-%S")))
}

/// Write the site map as JSON with 2-space indentation
pub fn write_snapshot(site_map: &SiteMap, path: &Path) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(site_map)?;
    std::fs::write(path, json).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_snapshot(path: &Path) -> Result<SiteMap, SnapshotError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}
