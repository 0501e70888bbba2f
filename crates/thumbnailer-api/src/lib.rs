//! Event intake service for the thumbnail pipeline.
//!
//! Receives storage notifications as CloudEvents over HTTP and runs one
//! pipeline invocation per request.

pub mod cloudevent;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use setup::routes::setup_routes;
pub use state::AppState;
