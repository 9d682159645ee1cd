//! Configuration module for Atlas
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ATLAS_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! Credentials are never stored in the file; each section names the
//! environment variable to read them from (`api_key_env`, `maps_api_key_env`).
//!
//! # Example
//!
//! ```rust
//! use atlas::config::AtlasConfig;
//!
//! let config = AtlasConfig::default();
//! assert_eq!(config.server.port, 8000);
//!
//! let toml = r#"
//! [recommend]
//! default_number = 10
//! "#;
//! let config: AtlasConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.recommend.default_number, 10);
//! assert_eq!(config.recommend.initial_fetch_limit, 30);
//! ```

pub mod error;
pub mod llm;
pub mod logging;
pub mod providers;
pub mod recommend;
pub mod server;

pub use error::ConfigError;
pub use llm::{LlmConfig, LlmProvider};
pub use logging::{LogFormat, LoggingConfig};
pub use providers::ProvidersConfig;
pub use recommend::RecommendConfig;
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration written by `atlas config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../atlas.example.toml");

/// Unified configuration for the Atlas server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AtlasConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Language model used by the oracles and the chat reply
    pub llm: LlmConfig,
    /// Places, weather, routing, car-rental and fuel providers
    pub providers: ProvidersConfig,
    /// Recommendation pipeline defaults
    pub recommend: RecommendConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AtlasConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports ATLAS_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("ATLAS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("ATLAS_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("ATLAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ATLAS_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(url) = std::env::var("ATLAS_LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("ATLAS_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(model) = std::env::var("ATLAS_CHAT_MODEL") {
            self.llm.chat_model = model;
        }
        if let Ok(timeout) = std::env::var("ATLAS_LLM_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.llm.timeout_seconds = t;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(validation("server.port", "port must be non-zero"));
        }

        if self.llm.provider != LlmProvider::Disabled {
            if self.llm.base_url.is_empty() {
                return Err(validation("llm.base_url", "URL cannot be empty"));
            }
            if self.llm.model.is_empty() {
                return Err(validation("llm.model", "model cannot be empty"));
            }
            if self.llm.timeout_seconds == 0 {
                return Err(validation("llm.timeout_seconds", "timeout must be non-zero"));
            }
        }

        let provider_urls = [
            ("providers.maps_base_url", &self.providers.maps_base_url),
            ("providers.weather_base_url", &self.providers.weather_base_url),
            ("providers.car_rental_base_url", &self.providers.car_rental_base_url),
            ("providers.fuel_base_url", &self.providers.fuel_base_url),
        ];
        for (field, url) in provider_urls {
            if url.is_empty() {
                return Err(validation(field, "URL cannot be empty"));
            }
        }
        if self.providers.timeout_seconds == 0 {
            return Err(validation(
                "providers.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        if self.recommend.default_number == 0 {
            return Err(validation("recommend.default_number", "must be at least 1"));
        }
        if self.recommend.initial_fetch_limit == 0 {
            return Err(validation(
                "recommend.initial_fetch_limit",
                "must be at least 1",
            ));
        }
        if self.recommend.default_radius == 0 {
            return Err(validation("recommend.default_radius", "radius must be non-zero"));
        }

        Ok(())
    }

    /// The maps credential the server refuses to start without.
    pub fn require_maps_api_key(&self) -> Result<String, ConfigError> {
        self.providers
            .maps_api_key()
            .ok_or_else(|| ConfigError::MissingField {
                field: "providers.maps_api_key_env".to_string(),
                env: self.providers.maps_api_key_env.clone(),
            })
    }
}

fn validation(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
