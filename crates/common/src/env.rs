//! Environment/runtime helpers
//!
//! Sanity checks on the store location before the store is opened.
//! Creating missing directories is left to `models::db::open`.

use std::path::Path;

use tracing::{info, warn};

/// Reject a store path that points at a directory; note whether a fresh store will be created.
pub async fn ensure_env(store_path: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(Path::new(store_path)).await {
        Ok(meta) if meta.is_dir() => {
            return Err(anyhow::anyhow!("{store_path} is a directory, expected a store file"));
        }
        Ok(_) => info!(%store_path, "reusing existing store"),
        Err(_) => warn!(%store_path, "store file not found; a new empty store will be created"),
    }
    Ok(())
}
