//! Request and response bodies of the HTTP API.

use crate::geo::{LatLng, Location};
use crate::providers::{CarOffer, TravelMode};
use crate::recommend::{Candidate, SortKey};
use crate::slots::{SlotField, SlotRecord};
use crate::travel::{OptimizedRoute, RouteOption};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversation
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub state: SlotRecord,
    pub missing_fields: Vec<SlotField>,
    pub core_complete: bool,
    pub complete: bool,
}

/// Query of `GET /api/stream`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One Server-Sent Event of `GET /api/stream`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Chunk {
        content: String,
    },
    Complete {
        session_id: String,
        state: SlotRecord,
        missing_fields: Vec<SlotField>,
        core_complete: bool,
        complete: bool,
        next_step: &'static str,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub session_id: Option<String>,
}

// ============================================================================
// Travel data
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttractionsRequest {
    /// Use this session's slot record as the preferences.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Preferences given directly; merged over the session's record.
    #[serde(default)]
    pub preferences: Option<SlotRecord>,
    /// Overrides the `city` preference.
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub number: Option<usize>,
    #[serde(default)]
    pub sort_by: Option<SortKey>,
    #[serde(default)]
    pub poi_type: Option<String>,
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub include_weather: bool,
}

/// Marker for one attraction on a map.
#[derive(Debug, Clone, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub name: String,
    pub location: Location,
}

impl From<&Candidate> for MapPoint {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            location: candidate.location,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttractionsResponse {
    pub city: String,
    pub location: LatLng,
    pub attractions: Vec<Candidate>,
    pub map_data: Vec<MapPoint>,
    pub weather_summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyQuery {
    #[serde(default)]
    pub radius: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutesRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub waypoints: Vec<String>,
    #[serde(default)]
    pub mode: TravelMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutesResponse {
    /// One entry per travel mode; empty when waypoints were given.
    pub routes: Vec<RouteOption>,
    /// Present when waypoints were given and the provider answered.
    pub optimized: Option<OptimizedRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
    /// `YYYY-MM-DD`; today when absent.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default = "default_forecast_days")]
    pub days: u32,
    #[serde(default = "default_true")]
    pub summary: bool,
}

fn default_forecast_days() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarsRequest {
    pub location: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    #[serde(default)]
    pub driver_age: Option<u32>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarsResponse {
    pub cars: Vec<CarOffer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuelQuery {
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuelResponse {
    pub location: String,
    /// USD per gallon; `None` when unknown.
    pub price: Option<f64>,
    pub currency: &'static str,
}

// ============================================================================
// Errors
// ============================================================================

/// API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Create a bad request error (400).
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.to_string(),
                r#type: "invalid_request_error".to_string(),
                param: None,
                code: Some("invalid_request_error".to_string()),
            },
        }
    }

    /// Bad request naming the offending parameter (400).
    pub fn invalid_param(param: &str, message: &str) -> Self {
        let mut error = Self::bad_request(message);
        error.error.param = Some(param.to_string());
        error
    }

    /// Create a session not found error (404).
    pub fn session_not_found(session_id: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: format!("Session '{}' not found", session_id),
                r#type: "invalid_request_error".to_string(),
                param: Some("session_id".to_string()),
                code: Some("session_not_found".to_string()),
            },
        }
    }

    /// Get the HTTP status code for this error.
    fn status_code(&self) -> StatusCode {
        match self.error.code.as_deref() {
            Some("invalid_request_error") => StatusCode::BAD_REQUEST,
            Some("session_not_found") => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_event_tagging() {
        let chunk = serde_json::to_value(StreamEvent::Chunk {
            content: "Hi".to_string(),
        })
        .unwrap();
        assert_eq!(chunk, json!({"type": "chunk", "content": "Hi"}));

        let error = serde_json::to_value(StreamEvent::Error {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(error["type"], "error");
    }

    #[test]
    fn test_attractions_request_minimal() {
        let req: AttractionsRequest = serde_json::from_value(json!({
            "preferences": {"city": "Paris", "hobbies": "art", "unknown": 1},
            "sort_by": "price"
        }))
        .unwrap();
        assert_eq!(req.sort_by, Some(SortKey::Price));
        assert!(!req.include_weather);
        assert_eq!(req.preferences.unwrap().len(), 2);
    }

    #[test]
    fn test_weather_request_defaults() {
        let req: WeatherRequest = serde_json::from_value(json!({"city": "Lima"})).unwrap();
        assert_eq!(req.days, 3);
        assert!(req.summary);
    }

    #[test]
    fn test_api_error_serialize_400() {
        let error = ApiError::invalid_param("start_date", "Invalid date");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error"]["param"], "start_date");
        assert_eq!(json["error"]["code"], "invalid_request_error");
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::bad_request("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::session_not_found("x").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_api_error_unknown_code_returns_500() {
        let error = ApiError {
            error: ApiErrorBody {
                message: "x".to_string(),
                r#type: "server_error".to_string(),
                param: None,
                code: Some("something_else".to_string()),
            },
        };
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
