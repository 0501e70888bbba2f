//! Thumbnailer Infrastructure Library
//!
//! Shared infrastructure for the thumbnailer service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - HTTP error response body

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{get_request_id, request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

pub use error::ErrorResponse;
