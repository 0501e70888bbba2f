//! Error types module
//!
//! `AppError` is the error surfaced by the HTTP intake. Pipeline failures never
//! reach the HTTP layer; they live in [`crate::pipeline_error`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_EVENT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request does not carry a decodable storage event
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// The invocation was interrupted and should be redelivered
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// (http_status, error_code, recoverable, suggested_action, sensitive, log_level)
type StaticMetadata = (u16, &'static str, bool, Option<&'static str>, bool, LogLevel);

fn app_error_static_metadata(err: &AppError) -> StaticMetadata {
    match err {
        AppError::InvalidEvent(_) => (
            400,
            "INVALID_EVENT",
            false,
            Some("Send a CloudEvent whose data is a storage object with bucket and name"),
            false,
            LogLevel::Debug,
        ),
        AppError::ServiceUnavailable(_) => (
            503,
            "SERVICE_UNAVAILABLE",
            true,
            Some("Redeliver the event later"),
            false,
            LogLevel::Warn,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidEvent(_) => "InvalidEvent",
            AppError::ServiceUnavailable(_) => "ServiceUnavailable",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidEvent(msg) | AppError::ServiceUnavailable(msg) => msg.clone(),
            AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
