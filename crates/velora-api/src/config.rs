//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so a fresh checkout runs with zero setup.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use velora_core::DEFAULT_PAGE_SIZE;
use velora_store::{StoreConfig, DEFAULT_LATENCY_MS};

/// Service facade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Simulated store latency in milliseconds
    pub latency_ms: u64,

    /// Default page size for listings
    pub page_size: u32,

    /// Admin sign-in email
    pub admin_email: String,

    /// Admin sign-in password (hashed at startup, never stored in plain
    /// text past construction)
    pub admin_password: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            jwt_secret: env::var("VELORA_JWT_SECRET")
                // In production this MUST be set via environment variable
                .unwrap_or_else(|_| "velora-dev-secret-change-in-production".to_string()),

            jwt_lifetime_secs: env::var("VELORA_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("VELORA_JWT_LIFETIME_SECS".to_string()))?,

            latency_ms: env::var("VELORA_LATENCY_MS")
                .unwrap_or_else(|_| DEFAULT_LATENCY_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("VELORA_LATENCY_MS".to_string()))?,

            page_size: env::var("VELORA_PAGE_SIZE")
                .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("VELORA_PAGE_SIZE".to_string()))?,

            admin_email: env::var("VELORA_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@velora.shop".to_string()),

            admin_password: env::var("VELORA_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "VELORA_JWT_LIFETIME_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Store construction options derived from this config.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            latency: Duration::from_millis(self.latency_ms),
            seed: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            jwt_secret: "velora-dev-secret-change-in-production".to_string(),
            jwt_lifetime_secs: 86400,
            latency_ms: DEFAULT_LATENCY_MS,
            page_size: DEFAULT_PAGE_SIZE,
            admin_email: "admin@velora.shop".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
