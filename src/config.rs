use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

/// Largest byte range the blob store hands back in one fetch.
pub const DEFAULT_FETCH_PAGE_SIZE: u64 = 1_015_808;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub shopping: ShoppingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: String,
    pub fetch_page_size: u64,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingConfig {
    pub serpapi_key: String,
    pub language: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Every setting has a default, so an empty lookup yields a usable
    /// in-memory configuration.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "8080")
                    .parse()
                    .context("PORT must be a port number")?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: var("MAX_UPLOAD_BYTES", "33554432")
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
            },
            storage: StorageConfig {
                provider: var("STORAGE_PROVIDER", "memory").to_lowercase(),
                fetch_page_size: var("BLOB_FETCH_PAGE_SIZE", &DEFAULT_FETCH_PAGE_SIZE.to_string())
                    .parse()
                    .context("BLOB_FETCH_PAGE_SIZE must be a byte count")?,
                s3_bucket: lookup("S3_BUCKET").unwrap_or_default(),
                s3_region: var("S3_REGION", "us-east-1"),
                s3_access_key_id: lookup("AWS_ACCESS_KEY_ID"),
                s3_secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
                s3_endpoint: lookup("S3_ENDPOINT"),
            },
            shopping: ShoppingConfig {
                serpapi_key: lookup("SERPAPI_KEY").unwrap_or_default(),
                language: var("SHOPPING_LANGUAGE", "en"),
                max_results: var("SHOPPING_MAX_RESULTS", "24")
                    .parse()
                    .context("SHOPPING_MAX_RESULTS must be a number")?,
            },
            logging: LoggingConfig {
                log_dir: lookup("LOG_DIR").filter(|dir| !dir.is_empty()),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
