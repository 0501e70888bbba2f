//! Thumbnail pipeline orchestration
//!
//! One call to [`ThumbnailPipeline::handle`] per delivered storage notification:
//! filter, parse, read the original, derive, write the thumbnail, report.
//! Errors never escape `handle`; every invocation ends in a [`Disposition`].

pub mod disposition;
pub mod orchestrator;
pub mod signal;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use disposition::{Disposition, Stage};
pub use orchestrator::{PipelineSettings, ThumbnailPipeline};
pub use signal::InvocationSignal;
