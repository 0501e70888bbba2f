//! Shared key generation for storage backends.

use uuid::Uuid;

const THUMBNAIL_SUFFIX: &str = "_thumb";

/// Destination key of the thumbnail for `asset_id`.
///
/// An empty prefix puts the thumbnail at the bucket root.
pub fn thumbnail_key(prefix: &str, asset_id: Uuid, extension: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}{}.{}", asset_id, THUMBNAIL_SUFFIX, extension)
    } else {
        format!("{}/{}{}.{}", prefix, asset_id, THUMBNAIL_SUFFIX, extension)
    }
}

/// Reject keys and bucket names that could escape their namespace.
#[cfg_attr(not(feature = "storage-local"), allow(dead_code))]
pub(crate) fn validate_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/')
}
