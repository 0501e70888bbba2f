use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ProcessingError;
use crate::format::ThumbnailFormat;

/// Encoded thumbnail ready to be stored
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Bytes,
    pub format: ThumbnailFormat,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Derives a thumbnail from the bytes of an original.
///
/// Deterministic for a given input and configuration, and free of side effects.
#[async_trait]
pub trait ThumbnailDeriver: Send + Sync {
    async fn derive(&self, original: &[u8]) -> Result<Thumbnail, ProcessingError>;
}
