//! Thumbnailer Core Library
//!
//! Domain models, the object key parser, the origin filter, error types and
//! configuration shared by every thumbnailer crate.

pub mod config;
pub mod error;
pub mod models;
pub mod object_path;
pub mod origin_filter;
pub mod pipeline_error;
pub mod reporting;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ThumbnailerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AssetIdentity, EventKind, ProcessingOutcome, StorageNotification, ThumbnailStatus,
    GCS_OBJECT_FINALIZED,
};
pub use object_path::parse_object_key;
pub use origin_filter::{is_own_output, FilterDecision, OriginFilter};
pub use pipeline_error::PipelineError;
pub use reporting::{NoOpNotifier, OutcomeNotifier, ReportError, StatusReporter};
pub use storage_types::StorageBackend;
