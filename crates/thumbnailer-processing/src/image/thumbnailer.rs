use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use std::io::Cursor;

use super::orientation::ImageOrientation;
use crate::deriver::{Thumbnail, ThumbnailDeriver};
use crate::error::ProcessingError;
use crate::format::ThumbnailFormat;

const DEFAULT_MAX_DIMENSION: u32 = 200;
const DEFAULT_MAX_SOURCE_BYTES: usize = 25 * 1024 * 1024;

/// Bounding box, output format and input limit of the thumbnailer
#[derive(Debug, Clone)]
pub struct ThumbnailOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub format: ThumbnailFormat,
    pub max_source_bytes: usize,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            format: ThumbnailFormat::default(),
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

/// [`ThumbnailDeriver`] backed by the `image` crate.
///
/// Images are scaled down to fit the bounding box with their aspect ratio
/// preserved. Images already inside the box keep their size.
#[derive(Debug, Clone, Default)]
pub struct ImageThumbnailer {
    options: ThumbnailOptions,
}

impl ImageThumbnailer {
    pub fn new(options: ThumbnailOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ThumbnailOptions {
        &self.options
    }

    /// Synchronous rendering; CPU bound, run it off the async executor.
    pub fn render(data: &[u8], options: &ThumbnailOptions) -> Result<Thumbnail, ProcessingError> {
        let source_format = image::guess_format(data).map_err(map_image_error)?;
        let img = image::load_from_memory_with_format(data, source_format)
            .map_err(map_image_error)?;
        let img = ImageOrientation::apply_exif_orientation(img, data);

        let (width, height) = img.dimensions();
        let img = if width > options.max_width || height > options.max_height {
            img.thumbnail(options.max_width, options.max_height)
        } else {
            img
        };

        let (width, height) = img.dimensions();
        let data = encode(img, options.format)?;

        Ok(Thumbnail {
            data: Bytes::from(data),
            format: options.format,
            width,
            height,
        })
    }
}

fn encode(img: DynamicImage, format: ThumbnailFormat) -> Result<Vec<u8>, ProcessingError> {
    // JPEG has no alpha channel; PNG and WebP are written as 8-bit RGBA.
    let (img, image_format) = match format {
        ThumbnailFormat::Png => (DynamicImage::ImageRgba8(img.to_rgba8()), ImageFormat::Png),
        ThumbnailFormat::Jpeg => (DynamicImage::ImageRgb8(img.to_rgb8()), ImageFormat::Jpeg),
        ThumbnailFormat::WebP => (DynamicImage::ImageRgba8(img.to_rgba8()), ImageFormat::WebP),
    };

    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, image_format)
        .map_err(|e| ProcessingError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn map_image_error(err: ImageError) -> ProcessingError {
    match err {
        ImageError::Unsupported(e) => ProcessingError::UnsupportedFormat(e.to_string()),
        other => ProcessingError::Decode(other.to_string()),
    }
}

#[async_trait]
impl ThumbnailDeriver for ImageThumbnailer {
    async fn derive(&self, original: &[u8]) -> Result<Thumbnail, ProcessingError> {
        if original.is_empty() {
            return Err(ProcessingError::EmptySource);
        }
        if original.len() > self.options.max_source_bytes {
            return Err(ProcessingError::SourceTooLarge {
                size: original.len(),
                limit: self.options.max_source_bytes,
            });
        }

        let start = std::time::Instant::now();
        let data = original.to_vec();
        let options = self.options.clone();

        let thumbnail =
            tokio::task::spawn_blocking(move || Self::render(&data, &options)).await??;

        tracing::debug!(
            source_bytes = original.len(),
            thumbnail_bytes = thumbnail.data.len(),
            width = thumbnail.width,
            height = thumbnail.height,
            format = %thumbnail.format,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail derived"
        );

        Ok(thumbnail)
    }
}
