//! Image thumbnailing
//!
//! Decoding, EXIF orientation correction, bounded resizing and encoding, all
//! on top of the `image` crate.

mod orientation;
mod thumbnailer;

pub use orientation::ImageOrientation;
pub use thumbnailer::{ImageThumbnailer, ThumbnailOptions};
