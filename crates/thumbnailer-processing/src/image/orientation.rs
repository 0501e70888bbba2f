use image::DynamicImage;
use std::io::Cursor;

/// EXIF orientation handling (rotation and mirroring)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Read the EXIF orientation tag (1-8). Returns 1 (normal) when the data
    /// has no EXIF block or the tag is missing or out of range.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = Cursor::new(data);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(_) => return 1,
        };

        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    /// Clockwise rotation followed by an optional horizontal mirror that
    /// brings an image stored with `orientation` upright.
    pub fn transforms(orientation: u8) -> (Option<u16>, bool) {
        match orientation {
            2 => (None, true),
            3 => (Some(180), false),
            4 => (Some(180), true),
            5 => (Some(90), true),
            6 => (Some(90), false),
            7 => (Some(270), true),
            8 => (Some(270), false),
            _ => (None, false),
        }
    }

    pub fn apply(img: DynamicImage, orientation: u8) -> DynamicImage {
        let (rotate, mirror) = Self::transforms(orientation);

        let img = match rotate {
            Some(90) => img.rotate90(),
            Some(180) => img.rotate180(),
            Some(270) => img.rotate270(),
            _ => img,
        };

        if mirror {
            img.fliph()
        } else {
            img
        }
    }

    /// Apply the orientation recorded in `data` to its decoded image.
    pub fn apply_exif_orientation(img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        if orientation == 1 {
            return img;
        }

        tracing::debug!(orientation = orientation, "Applying EXIF orientation");
        Self::apply(img, orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    const MARK: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// 4x2 image, white, with a red pixel at (x, y).
    fn marked(x: u32, y: u32) -> DynamicImage {
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(x, y, MARK);
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_normal_orientation_is_identity() {
        let img = marked(0, 0);
        let out = ImageOrientation::apply(img.clone(), 1);
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.get_pixel(0, 0), MARK);
    }

    #[test]
    fn test_rotate_90_swaps_dimensions() {
        let out = ImageOrientation::apply(marked(0, 0), 6);
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(1, 0), MARK);
    }

    #[test]
    fn test_rotate_270() {
        let out = ImageOrientation::apply(marked(0, 0), 8);
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(0, 3), MARK);
    }

    #[test]
    fn test_mirror_orientations() {
        assert_eq!(ImageOrientation::apply(marked(0, 0), 2).get_pixel(3, 0), MARK);
        assert_eq!(ImageOrientation::apply(marked(0, 0), 3).get_pixel(3, 1), MARK);
        assert_eq!(ImageOrientation::apply(marked(0, 0), 4).get_pixel(0, 1), MARK);
    }

    #[test]
    fn test_transpose_and_transverse() {
        // 5 is a transpose: (x, y) -> (y, x)
        let out = ImageOrientation::apply(marked(3, 0), 5);
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(0, 3), MARK);

        // 7 is a transverse: (x, y) -> (h - 1 - y, w - 1 - x)
        let out = ImageOrientation::apply(marked(0, 0), 7);
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(1, 3), MARK);
    }

    #[test]
    fn test_read_orientation_without_exif() {
        assert_eq!(ImageOrientation::read_exif_orientation(b""), 1);
        assert_eq!(ImageOrientation::read_exif_orientation(b"not an image"), 1);
    }

    #[test]
    fn test_out_of_range_orientation_is_ignored() {
        assert_eq!(ImageOrientation::transforms(0), (None, false));
        assert_eq!(ImageOrientation::transforms(9), (None, false));
    }
}
