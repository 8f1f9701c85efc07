//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Warn when the frontend bundle is missing; the API still serves without it.
/// Returns whether the directory exists.
pub async fn ensure_env(static_dir: &str) -> anyhow::Result<bool> {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(anyhow::anyhow!("{static_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%static_dir, "frontend assets directory not found; static assets will 404");
            Ok(false)
        }
    }
}
