//! Data-provider configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest RapidAPI key accepted as real; anything shorter is a placeholder.
pub const MIN_RAPIDAPI_KEY_LEN: usize = 30;

/// `[providers]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Environment variable holding the Google Maps Platform key (required)
    pub maps_api_key_env: String,
    /// Environment variable holding the RapidAPI key (optional)
    pub rapidapi_key_env: String,
    /// Environment variable holding the fuel-price API key (optional)
    pub fuel_api_key_env: String,
    pub maps_base_url: String,
    pub weather_base_url: String,
    pub car_rental_base_url: String,
    /// RapidAPI host header for the car-rental search
    pub car_rental_host: String,
    pub fuel_base_url: String,
    /// Deadline for a single provider call
    pub timeout_seconds: u64,
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn maps_api_key(&self) -> Option<String> {
        read_env(&self.maps_api_key_env)
    }

    pub fn fuel_api_key(&self) -> Option<String> {
        read_env(&self.fuel_api_key_env)
    }

    /// RapidAPI key, if one of plausible length is set.
    pub fn rapidapi_key(&self) -> Option<String> {
        read_env(&self.rapidapi_key_env).filter(|k| k.len() >= MIN_RAPIDAPI_KEY_LEN)
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            maps_api_key_env: "MAPS_API_KEY".to_string(),
            rapidapi_key_env: "RAPIDAPI_KEY".to_string(),
            fuel_api_key_env: "FUEL_API_KEY".to_string(),
            maps_base_url: "https://maps.googleapis.com".to_string(),
            weather_base_url: "https://api.open-meteo.com".to_string(),
            car_rental_base_url: "https://booking-com15.p.rapidapi.com".to_string(),
            car_rental_host: "booking-com15.p.rapidapi.com".to_string(),
            fuel_base_url: "https://api.collectapi.com".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_providers_config_defaults() {
        let config = ProvidersConfig::default();
        assert_eq!(config.maps_api_key_env, "MAPS_API_KEY");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_short_rapidapi_key_rejected() {
        let config = ProvidersConfig {
            rapidapi_key_env: "ATLAS_TEST_SHORT_RAPIDAPI_KEY".to_string(),
            ..Default::default()
        };
        std::env::set_var("ATLAS_TEST_SHORT_RAPIDAPI_KEY", "YOUR_RAPIDAPI_KEY");
        assert!(config.rapidapi_key().is_none());

        std::env::set_var("ATLAS_TEST_SHORT_RAPIDAPI_KEY", "k".repeat(MIN_RAPIDAPI_KEY_LEN));
        assert!(config.rapidapi_key().is_some());
        std::env::remove_var("ATLAS_TEST_SHORT_RAPIDAPI_KEY");
    }
}
