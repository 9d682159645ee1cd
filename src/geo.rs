//! Geographic coordinate types shared by providers and candidates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resolved latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = String;

    /// Parse `"lat,lng"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected 'lat,lng', got '{}'", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: '{}'", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: '{}'", lng.trim()))?;

        let point = LatLng::new(lat, lng);
        if !point.is_valid() {
            return Err(format!("Coordinates out of range: {}", s));
        }
        Ok(point)
    }
}

/// Coordinates as received from a provider; either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Location {
    /// Keep only finite numbers; anything else becomes `None`.
    pub fn sanitized(lat: Option<f64>, lng: Option<f64>) -> Self {
        Self {
            lat: lat.filter(|v| v.is_finite()),
            lng: lng.filter(|v| v.is_finite()),
        }
    }

    pub fn to_lat_lng(self) -> Option<LatLng> {
        Some(LatLng::new(self.lat?, self.lng?))
    }
}

impl From<LatLng> for Location {
    fn from(point: LatLng) -> Self {
        Self {
            lat: Some(point.lat),
            lng: Some(point.lng),
        }
    }
}
