#[cfg(any(feature = "storage-s3", feature = "storage-gcs"))]
use crate::{CloudProvider, CloudTransfer};
#[cfg(feature = "storage-local")]
use crate::LocalTransfer;
use crate::{AssetTransfer, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use thumbnailer_core::Config;

/// Create the asset transfer backend selected by configuration
pub async fn create_transfer(config: &Config) -> StorageResult<Arc<dyn AssetTransfer>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint_url = config.s3_endpoint().map(String::from);

            Ok(Arc::new(CloudTransfer::new(CloudProvider::S3 {
                region,
                endpoint_url,
            })))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-gcs")]
        StorageBackend::Gcs => Ok(Arc::new(CloudTransfer::new(CloudProvider::Gcs {
            service_account_path: config.gcs_service_account_path().map(String::from),
        }))),

        #[cfg(not(feature = "storage-gcs"))]
        StorageBackend::Gcs => Err(StorageError::ConfigError(
            "GCS storage backend not available (storage-gcs feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalTransfer::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
