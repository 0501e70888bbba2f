//! Failure taxonomy for a single notification-handling invocation.

use crate::error::LogLevel;
use serde::Serialize;

/// Failure classes of the thumbnail pipeline.
///
/// Messages are opaque strings so an outcome can be cloned, logged and sent to
/// the metadata service without holding on to backend error types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum PipelineError {
    /// Object key or event kind that cannot yield an asset identity.
    #[error("Malformed notification: {0}")]
    MalformedNotification(String),

    /// Reading the original or writing the thumbnail failed.
    #[error("Transfer failed: {0}")]
    Transfer(String),

    /// The original could not be turned into a thumbnail.
    #[error("Derivation failed: {0}")]
    Derivation(String),

    /// The metadata service did not accept the status update.
    #[error("Reporting failed: {0}")]
    Reporting(String),
}

impl PipelineError {
    /// Machine-readable code used in structured logs and status reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::MalformedNotification(_) => "MALFORMED_NOTIFICATION",
            PipelineError::Transfer(_) => "TRANSFER_FAILURE",
            PipelineError::Derivation(_) => "DERIVATION_FAILURE",
            PipelineError::Reporting(_) => "REPORTING_FAILURE",
        }
    }

    /// Whether redelivering the same notification could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::Transfer(_) | PipelineError::Reporting(_))
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::MalformedNotification(_) => LogLevel::Warn,
            PipelineError::Derivation(_) => LogLevel::Warn,
            PipelineError::Transfer(_) | PipelineError::Reporting(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            PipelineError::MalformedNotification(String::new()).error_code(),
            PipelineError::Transfer(String::new()).error_code(),
            PipelineError::Derivation(String::new()).error_code(),
            PipelineError::Reporting(String::new()).error_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_recoverability() {
        assert!(PipelineError::Transfer("timeout".into()).is_recoverable());
        assert!(!PipelineError::Derivation("not an image".into()).is_recoverable());
        assert!(!PipelineError::MalformedNotification("bad-key".into()).is_recoverable());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(PipelineError::Derivation("bad header".into())).unwrap();
        assert_eq!(json["kind"], "derivation");
        assert_eq!(json["message"], "bad header");
    }
}
