use crate::keys::validate_key;
use crate::traits::{AssetTransfer, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem transfer, laid out as `{base_path}/{bucket}/{key}`.
#[derive(Clone)]
pub struct LocalTransfer {
    base_path: PathBuf,
    base_url: String,
}

impl LocalTransfer {
    /// Create a new LocalTransfer instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory; each bucket is a subdirectory (e.g., "/var/lib/thumbnailer")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8080/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalTransfer {
            base_path,
            base_url,
        })
    }

    /// Convert bucket and key to a filesystem path with security validation
    ///
    /// Rejects anything that could escape the base storage directory.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        if !validate_key(bucket) || bucket.contains('/') {
            return Err(StorageError::InvalidKey(format!(
                "Bucket name '{}' is not a single path segment",
                bucket
            )));
        }
        if !validate_key(key) {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let bucket_root = self.base_path.join(bucket);
        let path = bucket_root.join(key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        // Symlinks inside the tree could still point outside of it.
        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn generate_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), bucket, key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetTransfer for LocalTransfer {
    async fn read(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let path = self.object_path(bucket, key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(format!("{}/{}", bucket, key)));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(Bytes::from(data))
    }

    async fn write(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.object_path(bucket, key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(bucket, key);

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
