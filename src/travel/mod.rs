//! Travel information service.
//!
//! [`TravelInfo`] combines the data providers with the recommendation
//! pipeline. Every operation has a defined fallback, so provider failures
//! degrade to static substitute data and never reach the caller as errors.

pub mod fallback;
pub mod format;
pub mod types;

pub use fallback::{fallback_attractions, fallback_coordinates, mock_cars, DEFAULT_LOCATION};
pub use format::{format_distance, format_duration};
pub use types::{
    AttractionQuery, CarQuery, NearbyPlaces, OptimizedRoute, Photo, Restaurant, RouteOption,
    WeatherReport,
};

use crate::agent::{ChatMessage, CompletionRequest, LanguageModel};
use crate::config::{AtlasConfig, RecommendConfig};
use crate::geo::{LatLng, Location};
use crate::oracle::{DisabledOracle, LlmRankingOracle, RankingOracle};
use crate::providers::{
    CarOffer, CarRentalProvider, CarSearch, CollectApiFuel, DailyForecast, FuelPriceProvider,
    GoogleMaps, OpenMeteo, PlaceDetails, PlacesProvider, RapidApiCarRental, RawPlace, Route,
    RoutingProvider, TravelMode, WeatherProvider,
};
use crate::recommend::{Candidate, RecommendOptions, RecommendationCache, Recommender};
use crate::slots::SlotRecord;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Concurrent place-details lookups per attraction search.
const DETAILS_CONCURRENCY: usize = 8;
const ATTRACTION_PHOTO_WIDTH: u32 = 400;
const RESTAURANT_PHOTO_WIDTH: u32 = 800;
const MAX_RESTAURANTS: usize = 3;
const MAX_RESTAURANT_PHOTOS: usize = 3;
const RENTAL_TIME: &str = "10:00:00";

const WEATHER_SYSTEM_PROMPT: &str = "You are a helpful weather assistant that provides concise summaries of weather forecasts for travelers.";

fn record_provider_fallback(provider: &'static str) {
    metrics::counter!("atlas_provider_fallback_total", "provider" => provider).increment(1);
}

/// Travel data and recommendations over pluggable providers.
#[derive(Clone)]
pub struct TravelInfo {
    places: Arc<dyn PlacesProvider>,
    routing: Arc<dyn RoutingProvider>,
    weather: Arc<dyn WeatherProvider>,
    cars: Option<Arc<dyn CarRentalProvider>>,
    fuel: Option<Arc<dyn FuelPriceProvider>>,
    summarizer: Option<Arc<dyn LanguageModel>>,
    summary_timeout: Duration,
    recommender: Recommender,
    limits: RecommendConfig,
}

impl TravelInfo {
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        routing: Arc<dyn RoutingProvider>,
        weather: Arc<dyn WeatherProvider>,
        recommender: Recommender,
    ) -> Self {
        Self {
            places,
            routing,
            weather,
            cars: None,
            fuel: None,
            summarizer: None,
            summary_timeout: Duration::from_secs(60),
            recommender,
            limits: RecommendConfig::default(),
        }
    }

    pub fn with_car_rental(mut self, cars: Arc<dyn CarRentalProvider>) -> Self {
        self.cars = Some(cars);
        self
    }

    pub fn with_fuel_prices(mut self, fuel: Arc<dyn FuelPriceProvider>) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Language model used for forecast summaries.
    pub fn with_summarizer(mut self, model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        self.summarizer = Some(model);
        self.summary_timeout = timeout;
        self
    }

    pub fn with_limits(mut self, limits: RecommendConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Wire up the HTTP providers described by `config`.
    ///
    /// The car-rental and fuel providers are only attached when their keys
    /// are usable; without them those lookups use their fallbacks.
    pub fn from_config(
        config: &AtlasConfig,
        maps_api_key: String,
        client: Arc<Client>,
        model: Option<Arc<dyn LanguageModel>>,
        cache: Arc<RecommendationCache>,
    ) -> Self {
        let providers = &config.providers;
        let timeout = providers.timeout();

        let maps = Arc::new(GoogleMaps::new(
            providers.maps_base_url.clone(),
            maps_api_key,
            timeout,
            client.clone(),
        ));
        let weather = Arc::new(OpenMeteo::new(
            providers.weather_base_url.clone(),
            timeout,
            client.clone(),
        ));

        let oracle: Arc<dyn RankingOracle> = match &model {
            Some(model) => Arc::new(LlmRankingOracle::new(model.clone(), config.llm.timeout())),
            None => Arc::new(DisabledOracle),
        };

        let mut travel = Self::new(
            maps.clone(),
            maps,
            weather,
            Recommender::new(oracle, cache),
        )
        .with_limits(config.recommend.clone());

        match providers.rapidapi_key() {
            Some(key) => {
                travel = travel.with_car_rental(Arc::new(RapidApiCarRental::new(
                    providers.car_rental_base_url.clone(),
                    providers.car_rental_host.clone(),
                    key,
                    timeout,
                    client.clone(),
                )));
            }
            None => tracing::info!(
                env = %providers.rapidapi_key_env,
                "Car-rental key missing or too short; using sample offers"
            ),
        }

        if let Some(key) = providers.fuel_api_key() {
            travel = travel.with_fuel_prices(Arc::new(CollectApiFuel::new(
                providers.fuel_base_url.clone(),
                key,
                timeout,
                client,
            )));
        }

        if let Some(model) = model {
            travel = travel.with_summarizer(model, config.llm.timeout());
        }

        travel
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn limits(&self) -> &RecommendConfig {
        &self.limits
    }

    /// Coordinates for a city name.
    pub async fn city_to_location(&self, city: &str) -> LatLng {
        match self.places.geocode(city).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                tracing::warn!(city, "City not found; using built-in coordinates");
                record_provider_fallback("geocode");
                fallback_coordinates(city)
            }
            Err(e) => {
                tracing::warn!(city, error = %e, "Geocoding failed; using built-in coordinates");
                record_provider_fallback("geocode");
                fallback_coordinates(city)
            }
        }
    }

    /// Raw attraction candidates around `location`, before any ordering.
    pub async fn fetch_candidates(
        &self,
        location: LatLng,
        city: Option<&str>,
        query: &AttractionQuery,
    ) -> Vec<Candidate> {
        let places = match self
            .places
            .nearby(location, query.radius, &query.place_type)
            .await
        {
            Ok(places) if !places.is_empty() => places,
            Ok(_) => {
                tracing::info!(%location, place_type = %query.place_type, "No places found; using fallback attractions");
                record_provider_fallback("places");
                return fallback_attractions(city, location);
            }
            Err(e) => {
                tracing::warn!(%location, error = %e, "Nearby search failed; using fallback attractions");
                record_provider_fallback("places");
                return fallback_attractions(city, location);
            }
        };

        let limit = self.limits.initial_fetch_limit;
        let candidates: Vec<Candidate> = stream::iter(places.into_iter().take(limit))
            .map(|place| async move {
                match self.places.details(&place.place_id).await {
                    Ok(Some(details)) => Some(self.to_candidate(place, details)),
                    Ok(None) => {
                        tracing::debug!(place_id = %place.place_id, "No details; skipping place");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(place_id = %place.place_id, error = %e, "Details lookup failed; skipping place");
                        None
                    }
                }
            })
            .buffered(DETAILS_CONCURRENCY)
            .filter_map(|c| async move { c })
            .collect()
            .await;

        if candidates.is_empty() {
            record_provider_fallback("places");
            return fallback_attractions(city, location);
        }
        candidates
    }

    fn to_candidate(&self, place: RawPlace, details: PlaceDetails) -> Candidate {
        let name = details
            .name
            .or(place.name)
            .unwrap_or_else(|| "Unknown".to_string());
        let category = place
            .types
            .first()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let rating = details.rating.or(place.rating);

        let mut candidate = Candidate::new(place.place_id, name, category);
        candidate.estimated_duration = estimate_duration(&candidate.category, rating);
        candidate.rating = rating;
        candidate.user_ratings_total = details.user_ratings_total;
        candidate.price_level = details.price_level.or(place.price_level);
        if let Some(overview) = details.overview.filter(|o| !o.trim().is_empty()) {
            candidate.description = overview;
        }
        candidate.address = details.address;
        candidate.location = match details.location.to_lat_lng() {
            Some(point) => Location::from(point),
            None => place.location,
        };
        candidate.opening_hours = details.opening_hours;
        candidate.website = details.website;
        candidate.image_url = place
            .photos
            .first()
            .and_then(|p| self.places.photo_url(&p.reference, ATTRACTION_PHOTO_WIDTH));
        candidate.photo_references = place.photos.into_iter().map(|p| p.reference).collect();
        candidate.types = place.types;
        candidate
    }

    /// Ranked attractions around `location`.
    ///
    /// `city` only selects the fallback list when the provider has nothing.
    pub async fn attractions(
        &self,
        location: LatLng,
        city: Option<&str>,
        preferences: &SlotRecord,
        weather: Option<&str>,
        query: &AttractionQuery,
    ) -> Vec<Candidate> {
        let candidates = self.fetch_candidates(location, city, query).await;
        tracing::debug!(candidates = candidates.len(), "Fetched attraction candidates");

        let options = RecommendOptions {
            number: query.number,
            sort: query.sort,
        };
        self.recommender
            .recommend(candidates, preferences, weather, options)
            .await
    }

    /// One route per travel mode the provider answers.
    pub async fn plan_routes(&self, origin: &str, destination: &str) -> Vec<RouteOption> {
        let lookups = TravelMode::ALL.iter().map(|&mode| async move {
            match self.routing.directions(origin, destination, mode).await {
                Ok(Some(route)) => route_option(mode, &route),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(%mode, error = %e, "Directions lookup failed; skipping mode");
                    None
                }
            }
        });

        futures::future::join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Route from `origin` to `destination` through `waypoints` in
    /// optimized order.
    pub async fn plan_with_waypoints(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
        mode: TravelMode,
    ) -> Option<OptimizedRoute> {
        if waypoints.is_empty() {
            let driving = self
                .plan_routes(origin, destination)
                .await
                .into_iter()
                .find(|r| r.mode == TravelMode::Driving)?;
            return Some(OptimizedRoute {
                path_sequence: vec![origin.to_string(), destination.to_string()],
                waypoint_original_indices: Vec::new(),
                total_duration_text: driving.duration,
                total_duration_seconds: driving.duration_seconds,
                total_duration_in_traffic_text: None,
                total_duration_in_traffic_seconds: None,
                total_distance_text: driving.distance,
                total_distance_meters: driving.distance_meters,
                fare: driving.fare,
            });
        }

        let route = match self
            .routing
            .optimized(origin, destination, waypoints, mode)
            .await
        {
            Ok(Some(route)) if !route.legs.is_empty() => route,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(waypoints = waypoints.len(), error = %e, "Optimized route failed");
                return None;
            }
        };

        let duration: u64 = route.legs.iter().map(|l| l.duration_seconds).sum();
        let distance: u64 = route.legs.iter().map(|l| l.distance_meters).sum();
        let traffic: Option<u64> = route
            .legs
            .iter()
            .map(|l| l.duration_in_traffic_seconds)
            .sum();

        let mut path = Vec::with_capacity(route.legs.len() + 1);
        path.push(route.legs[0].start_address.clone());
        path.extend(route.legs.iter().map(|l| l.end_address.clone()));

        Some(OptimizedRoute {
            path_sequence: path,
            waypoint_original_indices: route.waypoint_order,
            total_duration_text: format_duration(Some(duration)),
            total_duration_seconds: duration,
            total_duration_in_traffic_text: traffic.map(|t| format_duration(Some(t))),
            total_duration_in_traffic_seconds: traffic,
            total_distance_text: format_distance(Some(distance)),
            total_distance_meters: distance,
            fare: route.fare,
        })
    }

    /// Daily forecast, optionally with a short summary from the language model.
    pub async fn weather(
        &self,
        location: LatLng,
        start_date: NaiveDate,
        days: u32,
        summary: bool,
    ) -> WeatherReport {
        let forecast = match self.weather.forecast(location, start_date, days).await {
            Ok(forecast) => forecast,
            Err(e) => {
                tracing::warn!(%location, error = %e, "Weather forecast failed");
                record_provider_fallback("weather");
                Vec::new()
            }
        };

        if forecast.is_empty() {
            return WeatherReport::default();
        }

        let summary = if summary {
            self.summarize(&forecast).await
        } else {
            None
        };

        WeatherReport {
            detailed_forecast: forecast,
            summary,
        }
    }

    async fn summarize(&self, forecast: &[DailyForecast]) -> Option<String> {
        let model = self.summarizer.as_ref()?;
        let data = serde_json::to_string(forecast).ok()?;
        let prompt = format!(
            "Summarize the following weather forecast in a concise paragraph (max 100 words). \
             Include key information about temperature ranges, precipitation, and any notable \
             weather conditions. Also mention any precautions travelers should take based on \
             the forecast. Weather data: {}",
            data
        );
        let request = CompletionRequest::new(vec![
            ChatMessage::system(WEATHER_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        match tokio::time::timeout(self.summary_timeout, model.complete(request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Weather summary failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.summary_timeout.as_millis() as u64,
                    "Weather summary timed out"
                );
                None
            }
        }
    }

    /// Rental offers cheapest first.
    ///
    /// Uses sample offers when no provider is configured, the search fails,
    /// or nothing survives the price filters.
    pub async fn car_rentals(&self, query: &CarQuery) -> Vec<CarOffer> {
        let Some(cars) = &self.cars else {
            return mock_cars(query.top_n);
        };

        let location = self.city_to_location(&query.location).await;
        let search = CarSearch {
            location,
            pickup_date: query.start_date,
            dropoff_date: query.end_date,
            time: RENTAL_TIME.to_string(),
            driver_age: query.driver_age,
            currency: "USD".to_string(),
        };

        let offers = match cars.search(&search).await {
            Ok(offers) => offers,
            Err(e) => {
                tracing::warn!(location = %query.location, error = %e, "Car-rental search failed; using sample offers");
                record_provider_fallback("car_rental");
                return mock_cars(query.top_n);
            }
        };

        let mut offers: Vec<CarOffer> = offers.into_iter().filter(|o| query.accepts(o)).collect();
        if offers.is_empty() {
            tracing::info!(location = %query.location, "No matching rental offers; using sample offers");
            record_provider_fallback("car_rental");
            return mock_cars(query.top_n);
        }
        offers.sort_by(|a, b| a.price.total_cmp(&b.price));
        offers.truncate(query.top_n);
        offers
    }

    /// The best-rated restaurants within `radius` meters.
    pub async fn nearby_restaurants(&self, location: LatLng, radius: u32) -> NearbyPlaces {
        let mut places = match self.places.nearby(location, radius, "restaurant").await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(%location, error = %e, "Restaurant search failed; using sample data");
                record_provider_fallback("places");
                return fallback::sample_restaurants();
            }
        };

        places.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0))
        });
        places.truncate(MAX_RESTAURANTS);

        let restaurants = stream::iter(places)
            .map(|place| async move {
                match self.places.details(&place.place_id).await {
                    Ok(Some(details)) => Some(self.to_restaurant(place, details)),
                    Ok(None) => {
                        tracing::debug!(place_id = %place.place_id, "No restaurant details; skipping");
                        None
                    }
                    Err(e) => {
                        tracing::debug!(place_id = %place.place_id, error = %e, "Restaurant details failed; skipping");
                        None
                    }
                }
            })
            .buffered(MAX_RESTAURANTS)
            .filter_map(|restaurant| async move { restaurant })
            .collect()
            .await;

        NearbyPlaces { restaurants }
    }

    fn to_restaurant(&self, place: RawPlace, details: PlaceDetails) -> Restaurant {
        let photos = place
            .photos
            .iter()
            .take(MAX_RESTAURANT_PHOTOS)
            .filter_map(|p| {
                let url = self.places.photo_url(&p.reference, RESTAURANT_PHOTO_WIDTH)?;
                Some(Photo {
                    url,
                    width: p.width.unwrap_or(800),
                    height: p.height.unwrap_or(600),
                })
            })
            .collect();

        Restaurant {
            name: details
                .name
                .or(place.name)
                .unwrap_or_else(|| "Unknown Restaurant".to_string()),
            kind: "restaurant".to_string(),
            rating: details.rating.or(place.rating).unwrap_or(0.0),
            price_level: details.price_level.or(place.price_level).unwrap_or(0),
            address: details
                .address
                .unwrap_or_else(|| "Unknown address".to_string()),
            photos,
            features: cuisine_features(&place.types),
        }
    }

    /// Gasoline price in USD per gallon, if known.
    pub async fn fuel_price(&self, location: &str) -> Option<f64> {
        let fuel = self.fuel.as_ref()?;
        match fuel.price(location).await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(location, error = %e, "Fuel price lookup failed");
                record_provider_fallback("fuel");
                None
            }
        }
    }
}

fn route_option(mode: TravelMode, route: &Route) -> Option<RouteOption> {
    let leg = route.legs.first()?;
    Some(RouteOption {
        mode,
        distance: leg.distance_text.clone(),
        duration: leg.duration_text.clone(),
        distance_meters: leg.distance_meters,
        duration_seconds: leg.duration_seconds,
        fare: route.fare.clone(),
    })
}

fn cuisine_features(types: &[String]) -> String {
    const CUISINES: [(&str, &str); 4] = [
        ("chinese_restaurant", "Chinese"),
        ("japanese_restaurant", "Japanese"),
        ("italian_restaurant", "Italian"),
        ("french_restaurant", "French"),
    ];

    let found: Vec<&str> = CUISINES
        .iter()
        .filter(|(kind, _)| types.iter().any(|t| t == kind))
        .map(|(_, label)| *label)
        .collect();

    if found.is_empty() {
        "Cuisine".to_string()
    } else {
        found.join(", ")
    }
}

/// Estimated visit length in hours.
///
/// # Examples
///
/// ```
/// use atlas::travel::estimate_duration;
///
/// assert_eq!(estimate_duration("museum", Some(4.0)), 2.0);
/// assert_eq!(estimate_duration("amusement_park", Some(4.8)), 9.0);
/// assert_eq!(estimate_duration("zoo", None), 2.25);
/// ```
pub fn estimate_duration(category: &str, rating: Option<f64>) -> f64 {
    let base = match category {
        "restaurant" | "museum" | "park" | "tourist_attraction" => 2.0,
        "night_club" | "shopping_mall" | "zoo" => 3.0,
        "amusement_park" => 6.0,
        _ => 2.0,
    };

    let rating = rating.unwrap_or(0.0);
    if rating > 4.5 {
        base * 1.5
    } else if rating < 3.0 {
        base * 0.75
    } else {
        base
    }
}
