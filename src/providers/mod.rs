//! Third-party travel data providers.
//!
//! Each provider is an `async_trait` trait so the travel service and the
//! HTTP layer hold `Arc<dyn …>` objects and tests substitute stubs. The
//! implementations here only translate wire formats; every fallback lives
//! in [`crate::travel`].

use crate::geo::LatLng;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub mod car_rental;
pub mod fuel;
pub mod google;
pub mod types;
pub mod weather;

pub use car_rental::RapidApiCarRental;
pub use fuel::CollectApiFuel;
pub use google::GoogleMaps;
pub use types::{
    CarOffer, CarSearch, DailyForecast, Leg, PhotoRef, PlaceDetails, RawPlace, Route, TravelMode,
};
pub use weather::OpenMeteo;

/// Errors from a data provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Non-2xx HTTP status.
    #[error("Provider HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body reports a failure (e.g. `REQUEST_DENIED`).
    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(timeout.as_millis() as u64)
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

/// Send a request and decode a JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ProviderError::Http {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// Points of interest, geocoding and place details.
#[async_trait]
pub trait PlacesProvider: Send + Sync + 'static {
    /// Coordinates of a city or address; `None` when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Option<LatLng>, ProviderError>;

    /// Places of `place_type` within `radius` meters of `location`.
    async fn nearby(
        &self,
        location: LatLng,
        radius: u32,
        place_type: &str,
    ) -> Result<Vec<RawPlace>, ProviderError>;

    /// Details for one place; `None` when the provider has none.
    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError>;

    /// Displayable URL for a photo reference.
    fn photo_url(&self, _reference: &str, _max_width: u32) -> Option<String> {
        None
    }
}

/// Daily weather forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync + 'static {
    async fn forecast(
        &self,
        location: LatLng,
        start_date: chrono::NaiveDate,
        days: u32,
    ) -> Result<Vec<DailyForecast>, ProviderError>;
}

/// Directions between places given as addresses, names or "lat,lng".
#[async_trait]
pub trait RoutingProvider: Send + Sync + 'static {
    /// Best route from `origin` to `destination`.
    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<Option<Route>, ProviderError>;

    /// Route through `waypoints` with their visiting order optimized.
    async fn optimized(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
        mode: TravelMode,
    ) -> Result<Option<Route>, ProviderError>;
}

/// Rental-car offers.
#[async_trait]
pub trait CarRentalProvider: Send + Sync + 'static {
    async fn search(&self, search: &CarSearch) -> Result<Vec<CarOffer>, ProviderError>;
}

/// Fuel prices.
#[async_trait]
pub trait FuelPriceProvider: Send + Sync + 'static {
    /// Gasoline price in USD per gallon; `None` when unknown for `location`.
    async fn price(&self, location: &str) -> Result<Option<f64>, ProviderError>;
}
