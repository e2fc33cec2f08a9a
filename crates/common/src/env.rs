//! Filesystem environment helpers
//!
//! Make sure the directories a data file lives in exist before writing.

use std::path::Path;
use tracing::debug;

/// Ensure the parent directory of `file` exists, creating it if needed.
/// A bare file name (no parent component) is a no-op.
pub async fn ensure_parent_dir(file: &Path) -> anyhow::Result<()> {
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(());
    }
    debug!(dir = %parent.display(), "creating data directory");
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("data.json");

        ensure_parent_dir(&file).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());

        // second call finds it in place
        ensure_parent_dir(&file).await?;

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_is_noop() -> Result<(), anyhow::Error> {
        ensure_parent_dir(Path::new("products.json")).await?;
        Ok(())
    }
}
