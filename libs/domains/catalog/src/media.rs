//! Media store seam for product images.
//!
//! Product mutations only need a store/remove capability; where bytes end
//! up is a collaborator concern. The local filesystem implementation is
//! the default; object storage can slot in behind the same trait.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{CatalogError, CatalogResult};

/// Storage abstraction for product images
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `bytes` under `filename`, returning the public URL
    async fn store(&self, filename: &str, bytes: &[u8]) -> CatalogResult<String>;

    /// Remove the object behind `url`. Unknown URLs are a no-op.
    async fn remove(&self, url: &str) -> CatalogResult<()>;
}

/// Local filesystem implementation of MediaStore
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Strip any path components so callers cannot escape the media root
    fn sanitize(filename: &str) -> CatalogResult<&str> {
        let name = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();

        if name.is_empty() || name == "." || name == ".." {
            return Err(CatalogError::Media(format!(
                "Invalid media filename: '{}'",
                filename
            )));
        }

        Ok(name)
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> CatalogResult<String> {
        let name = Self::sanitize(filename)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CatalogError::Media(format!("Failed to create media dir: {}", e)))?;

        let path = self.root.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CatalogError::Media(format!("Failed to write {}: {}", name, e)))?;

        tracing::debug!(file = name, "Stored media object");
        Ok(format!("{}/{}", self.base_url, name))
    }

    async fn remove(&self, url: &str) -> CatalogResult<()> {
        let name = match Self::sanitize(url) {
            Ok(name) => name,
            // Nothing we could own; treat as already gone
            Err(_) => return Ok(()),
        };

        let path = self.root.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(file = name, "Removed media object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CatalogError::Media(format!(
                "Failed to remove {}: {}",
                name, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(tag: &str) -> LocalMediaStore {
        let root = std::env::temp_dir().join(format!("media-{}-{}", tag, std::process::id()));
        LocalMediaStore::new(root, "http://localhost:8080/media")
    }

    #[tokio::test]
    async fn test_store_and_remove_round_trip() {
        let store = test_store("round-trip");

        let url = store.store("widget.png", b"png-bytes").await.unwrap();
        assert_eq!(url, "http://localhost:8080/media/widget.png");

        store.remove(&url).await.unwrap();
        // Second removal is a no-op
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_rejects_path_traversal() {
        let store = test_store("traversal");

        let result = store.store("../../etc/passwd", b"nope").await;
        // Traversal components are stripped, not honored
        assert_eq!(
            result.unwrap(),
            "http://localhost:8080/media/passwd"
        );

        let result = store.store("..", b"nope").await;
        assert!(matches!(result, Err(CatalogError::Media(_))));
    }
}
