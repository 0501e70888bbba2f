use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Output encoding of a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailFormat {
    #[default]
    Png,
    Jpeg,
    WebP,
}

impl ThumbnailFormat {
    /// File extension used in the destination key
    pub fn extension(&self) -> &'static str {
        match self {
            ThumbnailFormat::Png => "png",
            ThumbnailFormat::Jpeg => "jpg",
            ThumbnailFormat::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ThumbnailFormat::Png => "image/png",
            ThumbnailFormat::Jpeg => "image/jpeg",
            ThumbnailFormat::WebP => "image/webp",
        }
    }
}

impl FromStr for ThumbnailFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ThumbnailFormat::Png),
            "jpeg" | "jpg" => Ok(ThumbnailFormat::Jpeg),
            "webp" => Ok(ThumbnailFormat::WebP),
            other => Err(format!(
                "Invalid thumbnail format '{}', expected one of png, jpeg, webp",
                other
            )),
        }
    }
}

impl Display for ThumbnailFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.extension())
    }
}
