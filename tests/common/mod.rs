//! Shared test utilities for Atlas integration tests.
//!
//! Provides stub providers, scripted oracles and an app builder so the
//! HTTP tests never leave the process.

#![allow(dead_code)]

use async_trait::async_trait;
use atlas::agent::{AgentError, CompletionRequest, LanguageModel};
use atlas::api::{create_router, AppState};
use atlas::config::AtlasConfig;
use atlas::geo::{LatLng, Location};
use atlas::oracle::{DisabledOracle, ExtractionOracle, OracleError, RankingOracle};
use atlas::providers::{
    DailyForecast, Leg, PlaceDetails, PlacesProvider, ProviderError, RawPlace, Route,
    RoutingProvider, TravelMode, WeatherProvider,
};
use atlas::recommend::{Candidate, RecommendationCache, Recommender};
use atlas::session::Intake;
use atlas::slots::{SlotField, SlotRecord};
use atlas::travel::TravelInfo;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// Candidates and records
// =============================================================================

/// Candidate with a rating, the common shape in ranking tests.
pub fn make_candidate(id: &str, rating: Option<f64>) -> Candidate {
    let mut candidate = Candidate::new(id, id.to_uppercase(), "tourist_attraction");
    candidate.rating = rating;
    candidate
}

pub fn make_candidates(ids: &[&str]) -> Vec<Candidate> {
    ids.iter().map(|id| make_candidate(id, None)).collect()
}

pub fn ids(list: &[Candidate]) -> Vec<&str> {
    list.iter().map(|c| c.id.as_str()).collect()
}

/// Every required field filled for a trip to Paris.
pub fn paris_request() -> SlotRecord {
    [
        (SlotField::City, json!("Paris")),
        (SlotField::Days, json!("5")),
        (SlotField::Budget, json!("medium")),
        (SlotField::People, json!("2")),
        (SlotField::Kids, json!("no")),
        (SlotField::Health, json!("none")),
        (SlotField::Hobbies, json!("art museums")),
    ]
    .into_iter()
    .collect()
}

// =============================================================================
// Oracles
// =============================================================================

/// Extraction oracle answering a fixed record for every message.
pub struct ScriptedExtraction(pub SlotRecord);

#[async_trait]
impl ExtractionOracle for ScriptedExtraction {
    async fn try_extract(&self, _text: &str) -> Result<SlotRecord, OracleError> {
        Ok(self.0.clone())
    }
}

/// Ranking oracle that reverses the candidates and counts its calls.
#[derive(Default)]
pub struct ReversingRanker {
    pub calls: AtomicUsize,
}

impl ReversingRanker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankingOracle for ReversingRanker {
    async fn try_rank(
        &self,
        _preferences: &SlotRecord,
        candidates: &[Candidate],
        _weather: Option<&str>,
    ) -> Result<Vec<String>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(candidates.iter().rev().map(|c| c.id.clone()).collect())
    }
}

/// Ranking oracle that always fails and counts its calls.
#[derive(Default)]
pub struct FailingRanker {
    pub calls: AtomicUsize,
}

#[async_trait]
impl RankingOracle for FailingRanker {
    async fn try_rank(
        &self,
        _preferences: &SlotRecord,
        _candidates: &[Candidate],
        _weather: Option<&str>,
    ) -> Result<Vec<String>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OracleError::Malformed("not a list".to_string()))
    }
}

/// Language model with a fixed reply.
pub struct CannedModel(pub &'static str);

#[async_trait]
impl LanguageModel for CannedModel {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, AgentError> {
        Ok(self.0.to_string())
    }
}

// =============================================================================
// Providers
// =============================================================================

pub const PARIS: LatLng = LatLng::new(48.8566, 2.3522);

/// Places provider with three attractions around Paris.
pub struct StubPlaces;

#[async_trait]
impl PlacesProvider for StubPlaces {
    async fn geocode(&self, query: &str) -> Result<Option<LatLng>, ProviderError> {
        if query.eq_ignore_ascii_case("paris") {
            Ok(Some(PARIS))
        } else {
            Ok(None)
        }
    }

    async fn nearby(
        &self,
        location: LatLng,
        _radius: u32,
        place_type: &str,
    ) -> Result<Vec<RawPlace>, ProviderError> {
        if location != PARIS {
            return Ok(Vec::new());
        }
        let place = |id: &str, rating: f64, price: u8| RawPlace {
            place_id: id.to_string(),
            name: Some(id.to_uppercase()),
            rating: Some(rating),
            price_level: Some(price),
            types: vec![place_type.to_string()],
            location: Location::from(PARIS),
            photos: Vec::new(),
        };
        Ok(vec![
            place("louvre", 4.7, 3),
            place("orsay", 4.8, 2),
            place("tower", 4.5, 1),
        ])
    }

    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        Ok(Some(PlaceDetails {
            address: Some(format!("{} street, Paris", place_id)),
            ..PlaceDetails::default()
        }))
    }
}

/// Places provider that is always down.
pub struct DownPlaces;

#[async_trait]
impl PlacesProvider for DownPlaces {
    async fn geocode(&self, _query: &str) -> Result<Option<LatLng>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }

    async fn nearby(
        &self,
        _location: LatLng,
        _radius: u32,
        _place_type: &str,
    ) -> Result<Vec<RawPlace>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }

    async fn details(&self, _place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

/// Routing provider with one 10 km leg for every mode.
pub struct StubRouting;

#[async_trait]
impl RoutingProvider for StubRouting {
    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        _mode: TravelMode,
    ) -> Result<Option<Route>, ProviderError> {
        Ok(Some(Route {
            legs: vec![Leg {
                distance_text: "10 km".to_string(),
                duration_text: "20 mins".to_string(),
                distance_meters: 10_000,
                duration_seconds: 1_200,
                duration_in_traffic_seconds: None,
                start_address: origin.to_string(),
                end_address: destination.to_string(),
            }],
            waypoint_order: Vec::new(),
            fare: None,
        }))
    }

    async fn optimized(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
        mode: TravelMode,
    ) -> Result<Option<Route>, ProviderError> {
        let route = self.directions(origin, destination, mode).await?;
        Ok(route.map(|mut r| {
            r.waypoint_order = (0..waypoints.len()).rev().collect();
            r
        }))
    }
}

/// Weather provider answering the same mild day for every date.
pub struct StubWeather;

#[async_trait]
impl WeatherProvider for StubWeather {
    async fn forecast(
        &self,
        _location: LatLng,
        start_date: chrono::NaiveDate,
        days: u32,
    ) -> Result<Vec<DailyForecast>, ProviderError> {
        Ok((0..days)
            .map(|i| DailyForecast {
                date: (start_date + chrono::Duration::days(i as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                max_temp: "21°C".to_string(),
                min_temp: "12°C".to_string(),
                precipitation: "0 mm".to_string(),
                wind_speed: "10 km/h".to_string(),
                precipitation_probability: "5%".to_string(),
                uv_index: "4".to_string(),
            })
            .collect())
    }
}

// =============================================================================
// Application builders
// =============================================================================

pub fn travel_with(
    places: Arc<dyn PlacesProvider>,
    oracle: Arc<dyn RankingOracle>,
) -> TravelInfo {
    TravelInfo::new(
        places,
        Arc::new(StubRouting),
        Arc::new(StubWeather),
        Recommender::new(oracle, Arc::new(RecommendationCache::new())),
    )
}

/// State with stub providers, no language model and the given extraction.
pub fn make_state(extraction: SlotRecord) -> Arc<AppState> {
    let config = Arc::new(AtlasConfig::default());
    let travel = travel_with(Arc::new(StubPlaces), Arc::new(DisabledOracle));
    let intake = Intake::new(Arc::new(ScriptedExtraction(extraction)));
    Arc::new(AppState::new(config, travel, intake))
}

pub fn make_app(extraction: SlotRecord) -> axum::Router {
    create_router(make_state(extraction))
}
