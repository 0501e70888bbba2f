//! HTTP error response body
//!
//! The `IntoResponse` conversion for `AppError` lives in `thumbnailer-api`:
//! neither the trait nor the type is local to this crate.

use serde::Serialize;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub code: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}
