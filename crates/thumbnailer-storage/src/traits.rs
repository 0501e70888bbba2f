//! Asset transfer trait
//!
//! This module defines the boundary every storage backend implements.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reads originals and writes thumbnails.
///
/// Implementations keep no state between calls and never retry; a failed
/// call surfaces as an error and the pipeline decides what to report.
#[async_trait]
pub trait AssetTransfer: Send + Sync {
    /// Fetch the full object at `bucket`/`key`.
    async fn read(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;

    /// Store `data` at `bucket`/`key`, replacing any existing object, and
    /// return the location the thumbnail can be retrieved from.
    async fn write(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
