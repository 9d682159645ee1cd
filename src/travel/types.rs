//! Results returned by the travel service.

use crate::providers::{CarOffer, DailyForecast, TravelMode};
use crate::recommend::SortKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One way of getting from A to B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub mode: TravelMode,
    /// Provider-formatted distance (e.g. "10.2 km")
    pub distance: String,
    /// Provider-formatted duration (e.g. "25 mins")
    pub duration: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub fare: Option<String>,
}

/// A route through waypoints in optimized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    /// Origin, waypoints in visiting order, destination.
    pub path_sequence: Vec<String>,
    /// Visiting order of the requested waypoints (0-based).
    pub waypoint_original_indices: Vec<usize>,
    pub total_duration_text: String,
    pub total_duration_seconds: u64,
    pub total_duration_in_traffic_text: Option<String>,
    pub total_duration_in_traffic_seconds: Option<u64>,
    pub total_distance_text: String,
    pub total_distance_meters: u64,
    pub fare: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub detailed_forecast: Vec<DailyForecast>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: f64,
    pub price_level: u8,
    pub address: String,
    pub photos: Vec<Photo>,
    /// e.g. "Japanese, Italian", or "Cuisine" when unknown
    pub features: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlaces {
    pub restaurants: Vec<Restaurant>,
}

/// Parameters of an attraction search.
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionQuery {
    pub number: usize,
    pub place_type: String,
    pub sort: SortKey,
    /// Meters around the search point.
    pub radius: u32,
}

impl Default for AttractionQuery {
    fn default() -> Self {
        Self {
            number: 20,
            place_type: "tourist_attraction".to_string(),
            sort: SortKey::Rating,
            radius: 10_000,
        }
    }
}

/// Parameters of a rental-car search.
#[derive(Debug, Clone, PartialEq)]
pub struct CarQuery {
    /// City or address of the pickup
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub driver_age: u32,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub top_n: usize,
}

impl CarQuery {
    pub fn new(location: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            location: location.into(),
            start_date,
            end_date,
            driver_age: 30,
            min_price: None,
            max_price: None,
            top_n: 5,
        }
    }

    pub(crate) fn accepts(&self, offer: &CarOffer) -> bool {
        self.min_price.is_none_or(|min| offer.price >= min)
            && self.max_price.is_none_or(|max| offer.price <= max)
    }
}
