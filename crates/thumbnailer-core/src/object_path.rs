//! Object key parsing.
//!
//! Uploads are stored as `{owner_id}/{asset_id}/{original_file_name}`. The
//! asset id segment is the only part that must be a UUID; it is what the
//! metadata service knows the image by.

use uuid::Uuid;

use crate::models::AssetIdentity;
use crate::pipeline_error::PipelineError;

const SEPARATOR: char = '/';

/// Extract an [`AssetIdentity`] from a raw object key.
///
/// Requires at least two `/`-separated segments, a non-empty owner segment
/// and a UUID in the second segment. Remaining segments are joined back into
/// the original file name. Never returns a partial identity.
pub fn parse_object_key(object_key: &str) -> Result<AssetIdentity, PipelineError> {
    if object_key.is_empty() {
        return Err(PipelineError::MalformedNotification(
            "object key is empty".to_string(),
        ));
    }

    let mut segments = object_key.splitn(3, SEPARATOR);
    let owner_id = segments.next().unwrap_or_default();
    let asset_segment = segments.next().ok_or_else(|| {
        PipelineError::MalformedNotification(format!(
            "object key '{}' has a single path segment, expected {{owner}}/{{asset_id}}/...",
            object_key
        ))
    })?;

    if owner_id.is_empty() {
        return Err(PipelineError::MalformedNotification(format!(
            "object key '{}' has an empty owner segment",
            object_key
        )));
    }

    let asset_id = Uuid::parse_str(asset_segment).map_err(|e| {
        PipelineError::MalformedNotification(format!(
            "object key '{}' segment '{}' is not a valid asset id: {}",
            object_key, asset_segment, e
        ))
    })?;

    let original_file_name = segments.next().unwrap_or_default().to_string();

    Ok(AssetIdentity {
        owner_id: owner_id.to_string(),
        asset_id,
        original_file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET_ID: &str = "3fae1d2c-9b1e-4f2a-8c3e-111111111111";

    #[test]
    fn test_parse_full_key() {
        let identity = parse_object_key(&format!("user-42/{}/photo.jpg", ASSET_ID)).unwrap();
        assert_eq!(identity.owner_id, "user-42");
        assert_eq!(identity.asset_id, Uuid::parse_str(ASSET_ID).unwrap());
        assert_eq!(identity.original_file_name, "photo.jpg");
    }

    #[test]
    fn test_parse_two_segments_has_empty_file_name() {
        let identity = parse_object_key(&format!("user-42/{}", ASSET_ID)).unwrap();
        assert_eq!(identity.original_file_name, "");
    }

    #[test]
    fn test_file_name_keeps_nested_segments() {
        let identity =
            parse_object_key(&format!("user-42/{}/raw/2024/photo.jpg", ASSET_ID)).unwrap();
        assert_eq!(identity.original_file_name, "raw/2024/photo.jpg");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            parse_object_key(""),
            Err(PipelineError::MalformedNotification(_))
        ));
    }

    #[test]
    fn test_single_segment_rejected() {
        let err = parse_object_key("bad-key").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedNotification(_)));
        assert!(err.to_string().contains("single path segment"));
    }

    #[test]
    fn test_non_uuid_second_segment_rejected() {
        let suffixed = format!("user-42/{}_thumb.png", ASSET_ID);
        for key in [
            "user-42/not-a-uuid/photo.jpg",
            "user-42//photo.jpg",
            "user-42/",
            suffixed.as_str(),
        ] {
            assert!(
                matches!(
                    parse_object_key(key),
                    Err(PipelineError::MalformedNotification(_))
                ),
                "expected rejection for {key:?}"
            );
        }
    }

    #[test]
    fn test_empty_owner_rejected() {
        assert!(parse_object_key(&format!("/{}/photo.jpg", ASSET_ID)).is_err());
    }

    #[test]
    fn test_thumbnail_output_keys_never_parse() {
        // Output keys look like thumbnails/{id}_thumb.png, which must not re-enter the pipeline.
        let key = format!("thumbnails/{}_thumb.png", ASSET_ID);
        assert!(parse_object_key(&key).is_err());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let key = format!("user-42/{}/photo.jpg", ASSET_ID);
        assert_eq!(parse_object_key(&key), parse_object_key(&key));
    }
}
