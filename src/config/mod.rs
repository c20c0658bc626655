//! Configuration module for the storefront client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote storefront API
    pub api_url: String,
    /// Path to the persisted credential cache file
    pub token_path: PathBuf,
    /// Default listing page size
    pub page_size: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_url = env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000/api".to_string());

        let token_path = env::var("STOREFRONT_TOKEN_PATH")
            .unwrap_or_else(|_| "./data/token.json".to_string())
            .into();

        let page_size = env::var("STOREFRONT_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let log_level = env::var("STOREFRONT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            api_url,
            token_path,
            page_size,
            log_level,
        }
    }
}
