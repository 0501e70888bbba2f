use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::object_path;
use crate::pipeline_error::PipelineError;

/// Identity of an uploaded asset, derived from its object key
/// (`{owner_id}/{asset_id}/{original_file_name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIdentity {
    pub owner_id: String,
    pub asset_id: Uuid,
    pub original_file_name: String,
}

impl AssetIdentity {
    /// Parse an object key. See [`object_path::parse_object_key`].
    pub fn parse(object_key: &str) -> Result<Self, PipelineError> {
        object_path::parse_object_key(object_key)
    }
}
