//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; anything that
//! converts into `AppError` renders with the shared `ErrorResponse` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thumbnailer_core::{AppError, ErrorMetadata, LogLevel};
use thumbnailer_infra::ErrorResponse;

use crate::cloudevent::EnvelopeError;

/// Wrapper type for AppError to implement IntoResponse
/// (both the trait and `AppError` are foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<EnvelopeError> for HttpAppError {
    fn from(err: EnvelopeError) -> Self {
        HttpAppError(AppError::InvalidEvent(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let show_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_error_is_invalid_event() {
        let HttpAppError(app_err) = HttpAppError::from(EnvelopeError::MissingType);
        assert!(matches!(app_err, AppError::InvalidEvent(_)));
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_service_unavailable_status() {
        let response =
            HttpAppError(AppError::ServiceUnavailable("shutting down".into())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_anyhow_becomes_internal() {
        let HttpAppError(app_err) = HttpAppError::from(anyhow::anyhow!("boom"));
        assert_eq!(app_err.http_status_code(), 500);
    }
}
