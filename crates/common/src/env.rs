//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

/// Ensure the upload directories exist before the server accepts multipart
/// requests; image writes assume the tree is present.
pub async fn ensure_env(uploads_dir: &str) -> anyhow::Result<()> {
    for sub in ["profile-images", "services"] {
        let dir = format!("{uploads_dir}/{sub}");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    Ok(())
}
