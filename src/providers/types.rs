//! Provider-neutral records returned by the data providers.

use crate::geo::{LatLng, Location};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A photo attached to a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub reference: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One nearby-search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    pub place_id: String,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub location: Location,
    pub photos: Vec<PhotoRef>,
}

/// Place details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    /// Human-readable opening hours, one line per weekday.
    pub opening_hours: Option<Vec<String>>,
    pub address: Option<String>,
    pub location: Location,
    pub website: Option<String>,
    /// Editorial overview, when the provider has one.
    pub overview: Option<String>,
}

/// Forecast for one day, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    /// e.g. "22 °C"
    pub max_temp: String,
    pub min_temp: String,
    /// e.g. "0 mm"
    pub precipitation: String,
    /// e.g. "12 km/h"
    pub wind_speed: String,
    /// e.g. "5%"
    pub precipitation_probability: String,
    pub uv_index: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid travel mode: {}", s))
    }
}

/// One segment of a route between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance_text: String,
    pub duration_text: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub duration_in_traffic_seconds: Option<u64>,
    pub start_address: String,
    pub end_address: String,
}

/// A route as answered by the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<Leg>,
    /// Visiting order of the requested waypoints (0-based). Empty without waypoints.
    pub waypoint_order: Vec<usize>,
    pub fare: Option<String>,
}

/// Rental search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CarSearch {
    pub location: LatLng,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    /// `HH:MM:SS`, same for pickup and drop-off
    pub time: String,
    pub driver_age: u32,
    pub currency: String,
}

/// A rental-car offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarOffer {
    pub car_model: String,
    pub car_group: String,
    pub price: f64,
    pub currency: String,
    pub pickup_location_name: String,
    pub supplier_name: String,
    pub image_url: Option<String>,
}
