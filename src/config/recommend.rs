//! Recommendation defaults

use serde::{Deserialize, Serialize};

/// `[recommend]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Attractions returned when the caller does not ask for a count
    pub default_number: usize,
    /// Most raw places turned into candidates per search
    pub initial_fetch_limit: usize,
    /// Search radius in meters
    pub default_radius: u32,
    /// Radius for the restaurants-near-a-point lookup
    pub nearby_radius: u32,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_number: 20,
            initial_fetch_limit: 30,
            default_radius: 10_000,
            nearby_radius: 500,
        }
    }
}
