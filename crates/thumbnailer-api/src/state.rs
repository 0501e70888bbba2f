//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;
use thumbnailer_pipeline::{InvocationSignal, ThumbnailPipeline};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ThumbnailPipeline>,
    /// Event types that count as a completed upload
    pub finalized_event_types: Vec<String>,
    /// Budget for a single invocation
    pub pipeline_timeout: Duration,
    /// Cancelled when the server begins shutting down
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Signal for one invocation: fires on shutdown or when the timeout elapses.
    pub fn invocation_signal(&self) -> InvocationSignal {
        InvocationSignal::new(self.shutdown.child_token()).with_timeout(self.pipeline_timeout)
    }
}
