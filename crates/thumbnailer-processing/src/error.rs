use thiserror::Error;

/// Errors raised while deriving a thumbnail
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Source is {size} bytes, larger than the {limit} byte limit")]
    SourceTooLarge { size: usize, limit: usize },

    #[error("Source is empty")]
    EmptySource,

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(err: tokio::task::JoinError) -> Self {
        ProcessingError::Task(err.to_string())
    }
}
