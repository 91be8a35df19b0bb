//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PAGESIFT_*)
//! 2. TOML config file (if PAGESIFT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PAGESIFT_*)
/// 2. TOML config file (if PAGESIFT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for HTTP requests.
    ///
    /// Set via PAGESIFT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via PAGESIFT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay between consecutive page requests in milliseconds.
    ///
    /// Set via PAGESIFT_REQUEST_DELAY_MS environment variable.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Maximum bytes to download when probing an image candidate.
    ///
    /// Set via PAGESIFT_MAX_IMAGE_BYTES environment variable.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Minimum character count for extracted article content to pass
    /// the quality gate without falling back to DOM heuristics.
    ///
    /// Set via PAGESIFT_MIN_CONTENT_CHARS environment variable.
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
}

fn default_user_agent() -> String {
    // Browser-style UA; several CMSes serve stripped-down markup to
    // anything that does not look like a browser.
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_request_delay_ms() -> u64 {
    1_000
}

fn default_max_image_bytes() -> usize {
    5_242_880 // 5MiB
}

fn default_min_content_chars() -> usize {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            request_delay_ms: default_request_delay_ms(),
            max_image_bytes: default_max_image_bytes(),
            min_content_chars: default_min_content_chars(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Inter-request delay as Duration.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PAGESIFT_`
    /// 2. TOML file from `PAGESIFT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PAGESIFT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PAGESIFT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
