//! HTTP clients for the services that own image metadata.
//!
//! Provides a minimal client with configurable auth (Bearer token or X-API-Key)
//! and the two adapters the pipeline talks through: the thumbnail status
//! reporter and the user notification client.

pub mod notification;
pub mod status;

use reqwest::{Client, Method};
use serde::Serialize;
use std::time::Duration;
use thumbnailer_core::ReportError;

pub use notification::NotificationApiClient;
pub use status::MetadataStatusReporter;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// HTTP client bound to one base URL, with optional auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Option<Auth>, timeout: Duration) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            Some(Auth::XApiKey(key)) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    /// Send a JSON body. Any 2xx counts as accepted; the response body is ignored.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ReportError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.request(method, &url).json(body));

        let response = request.send().await.map_err(|e| ReportError::Transport {
            endpoint: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReportError::Rejected {
                endpoint: url,
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(())
    }

    /// PATCH JSON body.
    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ReportError> {
        self.send_json(Method::PATCH, path, body).await
    }

    /// POST JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ReportError> {
        self.send_json(Method::POST, path, body).await
    }
}
