//! Thumbnailer Processing Library
//!
//! Turns the bytes of an uploaded original into a bounded thumbnail. The
//! pipeline only sees the [`ThumbnailDeriver`] trait; [`ImageThumbnailer`] is
//! the `image`-crate implementation.

pub mod deriver;
pub mod error;
pub mod format;

#[cfg(feature = "image")]
pub mod image;

pub use deriver::{Thumbnail, ThumbnailDeriver};
pub use error::ProcessingError;
pub use format::ThumbnailFormat;

#[cfg(feature = "image")]
pub use crate::image::{ImageOrientation, ImageThumbnailer, ThumbnailOptions};
