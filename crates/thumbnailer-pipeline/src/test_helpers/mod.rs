//! Test helpers for pipeline tests
//!
//! In-memory implementations of every pipeline boundary. They record each call
//! so tests can assert on what the pipeline did and did not touch.

pub mod fakes;

pub use fakes::*;

use std::sync::Arc;

use crate::{PipelineSettings, ThumbnailPipeline};

/// Destination bucket used by [`pipeline_with`].
pub const TEST_DESTINATION_BUCKET: &str = "thumbs";

/// Pipeline wired to the given fakes, writing to [`TEST_DESTINATION_BUCKET`]
/// under the `thumbnails` prefix.
pub fn pipeline_with(
    transfer: &InMemoryTransfer,
    deriver: &StaticDeriver,
    reporter: &RecordingReporter,
    notifier: &RecordingNotifier,
) -> ThumbnailPipeline {
    ThumbnailPipeline::new(
        PipelineSettings::new(TEST_DESTINATION_BUCKET, "thumbnails"),
        Arc::new(transfer.clone()),
        Arc::new(deriver.clone()),
        Arc::new(reporter.clone()),
    )
    .with_notifier(Arc::new(notifier.clone()))
}
