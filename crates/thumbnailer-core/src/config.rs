//! Configuration module
//!
//! Configuration is read from the environment (a `.env` file is honoured in
//! development) and validated once at startup.

use std::env;

use crate::models::GCS_OBJECT_FINALIZED;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const THUMBNAIL_KEY_PREFIX: &str = "thumbnails";
const THUMBNAIL_MAX_WIDTH: u32 = 200;
const THUMBNAIL_MAX_HEIGHT: u32 = 200;
const MAX_SOURCE_SIZE_MB: usize = 25;
const METADATA_STATUS_PATH: &str = "api/images/{id}/thumbnail-status";
const METADATA_API_TIMEOUT_SECS: u64 = 10;
const PIPELINE_TIMEOUT_SECS: u64 = 120;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Thumbnail service configuration
#[derive(Clone, Debug)]
pub struct ThumbnailerConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub destination_bucket: String,
    pub source_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub gcs_service_account_path: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Thumbnail derivation
    pub thumbnail_key_prefix: String,
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
    pub thumbnail_format: String,
    pub max_source_size_bytes: usize,
    // Metadata service (status reporting)
    pub metadata_api_url: String,
    pub metadata_status_path: String,
    pub metadata_api_key: Option<String>,
    pub metadata_api_timeout_secs: u64,
    pub notification_api_url: Option<String>,
    // Event intake
    pub finalized_event_types: Vec<String>,
    pub pipeline_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ThumbnailerConfig>);

impl Config {
    fn inner(&self) -> &ThumbnailerConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ThumbnailerConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn destination_bucket(&self) -> &str {
        &self.inner().destination_bucket
    }

    pub fn source_bucket(&self) -> Option<&str> {
        self.inner().source_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn gcs_service_account_path(&self) -> Option<&str> {
        self.inner().gcs_service_account_path.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn thumbnail_key_prefix(&self) -> &str {
        &self.inner().thumbnail_key_prefix
    }

    pub fn thumbnail_max_width(&self) -> u32 {
        self.inner().thumbnail_max_width
    }

    pub fn thumbnail_max_height(&self) -> u32 {
        self.inner().thumbnail_max_height
    }

    pub fn thumbnail_format(&self) -> &str {
        &self.inner().thumbnail_format
    }

    pub fn max_source_size_bytes(&self) -> usize {
        self.inner().max_source_size_bytes
    }

    pub fn metadata_api_url(&self) -> &str {
        &self.inner().metadata_api_url
    }

    pub fn metadata_status_path(&self) -> &str {
        &self.inner().metadata_status_path
    }

    pub fn metadata_api_key(&self) -> Option<&str> {
        self.inner().metadata_api_key.as_deref()
    }

    pub fn metadata_api_timeout_secs(&self) -> u64 {
        self.inner().metadata_api_timeout_secs
    }

    pub fn notification_api_url(&self) -> Option<&str> {
        self.inner().notification_api_url.as_deref()
    }

    pub fn finalized_event_types(&self) -> &[String] {
        &self.inner().finalized_event_types
    }

    pub fn pipeline_timeout_secs(&self) -> u64 {
        self.inner().pipeline_timeout_secs
    }
}

impl ThumbnailerConfig {
    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated as unset.
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            log_format: var("LOG_FORMAT")
                .unwrap_or_else(|| "pretty".to_string())
                .to_lowercase(),
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let max_source_size_mb = var("MAX_SOURCE_SIZE_MB")
            .unwrap_or_else(|| MAX_SOURCE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_SOURCE_SIZE_MB);

        let finalized_event_types: Vec<String> = var("FINALIZED_EVENT_TYPES")
            .unwrap_or_else(|| GCS_OBJECT_FINALIZED.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = ThumbnailerConfig {
            base,
            storage_backend,
            destination_bucket: var("DESTINATION_BUCKET").unwrap_or_default(),
            source_bucket: var("SOURCE_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            gcs_service_account_path: var("GCS_SERVICE_ACCOUNT_PATH"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            thumbnail_key_prefix: var("THUMBNAIL_KEY_PREFIX")
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_else(|| THUMBNAIL_KEY_PREFIX.to_string()),
            thumbnail_max_width: var("THUMBNAIL_MAX_WIDTH")
                .and_then(|s| s.parse().ok())
                .unwrap_or(THUMBNAIL_MAX_WIDTH),
            thumbnail_max_height: var("THUMBNAIL_MAX_HEIGHT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(THUMBNAIL_MAX_HEIGHT),
            thumbnail_format: var("THUMBNAIL_FORMAT")
                .unwrap_or_else(|| "png".to_string())
                .to_lowercase(),
            max_source_size_bytes: max_source_size_mb * 1024 * 1024,
            metadata_api_url: var("METADATA_API_URL").unwrap_or_default(),
            metadata_status_path: var("METADATA_STATUS_PATH")
                .unwrap_or_else(|| METADATA_STATUS_PATH.to_string()),
            metadata_api_key: var("METADATA_API_KEY"),
            metadata_api_timeout_secs: var("METADATA_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&t| t > 0)
                .unwrap_or(METADATA_API_TIMEOUT_SECS),
            notification_api_url: var("NOTIFICATION_API_URL"),
            finalized_event_types,
            pipeline_timeout_secs: var("PIPELINE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&t| t > 0)
                .unwrap_or(PIPELINE_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.destination_bucket.is_empty() {
            return Err(anyhow::anyhow!("DESTINATION_BUCKET must be set"));
        }

        if self.source_bucket.as_deref() == Some(self.destination_bucket.as_str()) {
            return Err(anyhow::anyhow!(
                "SOURCE_BUCKET must differ from DESTINATION_BUCKET, otherwise every upload is discarded as pipeline output"
            ));
        }

        if !(self.metadata_api_url.starts_with("http://")
            || self.metadata_api_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "METADATA_API_URL must be an http(s) URL"
            ));
        }

        if !self.metadata_status_path.contains("{id}") {
            return Err(anyhow::anyhow!(
                "METADATA_STATUS_PATH must contain the {{id}} placeholder"
            ));
        }

        if self.thumbnail_max_width == 0 || self.thumbnail_max_height == 0 {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_MAX_WIDTH and THUMBNAIL_MAX_HEIGHT must be greater than zero"
            ));
        }

        if !matches!(self.thumbnail_format.as_str(), "png" | "jpeg" | "jpg" | "webp") {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_FORMAT must be one of png, jpeg, webp"
            ));
        }

        if self.finalized_event_types.is_empty() {
            return Err(anyhow::anyhow!(
                "FINALIZED_EVENT_TYPES must list at least one event type"
            ));
        }

        if !matches!(self.base.log_format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'pretty' or 'json'"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Gcs => {
                // Credentials fall back to the ambient service account.
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
