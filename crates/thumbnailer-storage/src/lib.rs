//! Thumbnailer Storage Library
//!
//! Byte transfer between the pipeline and object storage. Every call names the
//! bucket explicitly: originals are read from whatever bucket emitted the
//! notification, thumbnails are written to the configured destination bucket.
//!
//! # Thumbnail key format
//!
//! `{prefix}/{asset_id}_thumb.{extension}`, e.g. `thumbnails/{asset_id}_thumb.png`.
//! The key only depends on the asset id and the output format, so a redelivered
//! notification overwrites the same object. Key generation lives in the `keys`
//! module so all backends stay consistent.

#[cfg(any(feature = "storage-s3", feature = "storage-gcs"))]
pub mod cloud;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(any(feature = "storage-s3", feature = "storage-gcs"))]
pub use cloud::{CloudProvider, CloudTransfer};
pub use factory::create_transfer;
pub use keys::thumbnail_key;
#[cfg(feature = "storage-local")]
pub use local::LocalTransfer;
pub use thumbnailer_core::StorageBackend;
pub use traits::{AssetTransfer, StorageError, StorageResult};
