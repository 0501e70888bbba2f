//! Object storage transfer for S3 and Google Cloud Storage, backed by `object_store`.
//!
//! A store handle is bound to a single bucket, and notifications can name any
//! bucket, so a handle is built for each call from the provider settings.

use crate::traits::{AssetTransfer, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
};
use std::sync::Arc;

/// Provider-specific connection settings
#[derive(Clone, Debug)]
pub enum CloudProvider {
    #[cfg(feature = "storage-s3")]
    S3 {
        region: String,
        /// Custom endpoint for S3-compatible providers (MinIO, etc.)
        endpoint_url: Option<String>,
    },
    #[cfg(feature = "storage-gcs")]
    Gcs {
        /// Falls back to the ambient credentials when unset
        service_account_path: Option<String>,
    },
}

/// Object storage transfer
#[derive(Clone, Debug)]
pub struct CloudTransfer {
    provider: CloudProvider,
}

impl CloudTransfer {
    pub fn new(provider: CloudProvider) -> Self {
        Self { provider }
    }

    fn store_for(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        match &self.provider {
            #[cfg(feature = "storage-s3")]
            CloudProvider::S3 {
                region,
                endpoint_url,
            } => {
                use object_store::aws::AmazonS3Builder;

                let mut builder = AmazonS3Builder::from_env()
                    .with_region(region.clone())
                    .with_bucket_name(bucket);

                if let Some(ref endpoint) = endpoint_url {
                    let allow_http = endpoint.starts_with("http://");
                    builder = builder
                        .with_endpoint(endpoint.clone())
                        .with_allow_http(allow_http);
                }

                let store = builder
                    .build()
                    .map_err(|e| StorageError::ConfigError(e.to_string()))?;
                Ok(Arc::new(store))
            }
            #[cfg(feature = "storage-gcs")]
            CloudProvider::Gcs {
                service_account_path,
            } => {
                use object_store::gcp::GoogleCloudStorageBuilder;

                let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
                if let Some(ref path) = service_account_path {
                    builder = builder.with_service_account_path(path.clone());
                }

                let store = builder
                    .build()
                    .map_err(|e| StorageError::ConfigError(e.to_string()))?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Public URL of an object
    ///
    /// For AWS S3: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, path-style on the endpoint: {endpoint}/{bucket}/{key}
    /// For GCS: https://storage.googleapis.com/{bucket}/{key}
    pub fn generate_url(&self, bucket: &str, key: &str) -> String {
        match &self.provider {
            #[cfg(feature = "storage-s3")]
            CloudProvider::S3 {
                region,
                endpoint_url,
            } => match endpoint_url {
                Some(endpoint) => {
                    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
                }
                None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
            },
            #[cfg(feature = "storage-gcs")]
            CloudProvider::Gcs { .. } => {
                format!("https://storage.googleapis.com/{}/{}", bucket, key)
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        match self.provider {
            #[cfg(feature = "storage-s3")]
            CloudProvider::S3 { .. } => "s3",
            #[cfg(feature = "storage-gcs")]
            CloudProvider::Gcs { .. } => "gcs",
        }
    }
}

#[async_trait]
impl AssetTransfer for CloudTransfer {
    async fn read(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let result = match store.get(&location).await {
            Ok(response) => response.bytes().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                tracing::info!(
                    provider = self.provider_name(),
                    bucket = %bucket,
                    key = %key,
                    size_bytes = bytes.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object download successful"
                );
                Ok(bytes)
            }
            Err(ObjectStoreError::NotFound { .. }) => {
                Err(StorageError::NotFound(format!("{}/{}", bucket, key)))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    provider = self.provider_name(),
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object download failed"
                );
                Err(StorageError::DownloadFailed(e.to_string()))
            }
        }
    }

    async fn write(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);
        let size = data.len() as u64;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        store
            .put_opts(&location, PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = self.provider_name(),
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let url = self.generate_url(bucket, key);

        tracing::info!(
            provider = self.provider_name(),
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        match self.provider {
            #[cfg(feature = "storage-s3")]
            CloudProvider::S3 { .. } => StorageBackend::S3,
            #[cfg(feature = "storage-gcs")]
            CloudProvider::Gcs { .. } => StorageBackend::Gcs,
        }
    }
}
