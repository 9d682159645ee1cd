//! # HTTP API
//!
//! JSON endpoints for the conversational intake and the travel data
//! services.
//!
//! ## Endpoints
//!
//! - `POST /api/chat` - One intake turn, reply returned whole
//! - `GET /api/stream` - One intake turn, reply streamed as Server-Sent Events
//! - `GET /api/reset` - Discard a session
//! - `POST /api/attractions` - Ranked attractions for a city
//! - `GET /api/nearby/{lat},{lng}` - Restaurants around a point
//! - `POST /api/routes` - Routes per travel mode, or an optimized route
//! - `POST /api/weather` - Daily forecast with an optional summary
//! - `POST /api/cars` - Rental-car offers
//! - `GET /api/fuel` - Fuel price for a location
//! - `GET /health` - Liveness and state counts
//! - `GET /metrics` - Prometheus exposition
//!
//! ## Example
//!
//! ```no_run
//! use atlas::api::{create_router, AppState};
//! use atlas::config::AtlasConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(AtlasConfig::default());
//! let maps_key = config.require_maps_api_key()?;
//! let state = Arc::new(AppState::from_config(config, maps_key)?);
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Provider and model failures never surface as errors; they degrade to
//! substitute data. Only malformed requests are rejected:
//! ```json
//! {
//!   "error": {
//!     "message": "Invalid coordinates: 'abc'",
//!     "type": "invalid_request_error",
//!     "param": "coordinates",
//!     "code": "invalid_request_error"
//!   }
//! }
//! ```

mod attractions;
mod chat;
mod health;
mod travel;
pub mod types;

pub use types::*;

use crate::agent::{create_model, AgentError};
use crate::config::AtlasConfig;
use crate::metrics::MetricsCollector;
use crate::oracle::{DisabledOracle, ExtractionOracle, LlmExtractionOracle};
use crate::recommend::RecommendationCache;
use crate::session::{Intake, SessionStore};
use crate::travel::TravelInfo;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<AtlasConfig>,
    pub travel: TravelInfo,
    pub intake: Intake,
    pub sessions: SessionStore,
    pub cache: Arc<RecommendationCache>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    /// State over an already-built travel service and intake.
    pub fn new(config: Arc<AtlasConfig>, travel: TravelInfo, intake: Intake) -> Self {
        let start_time = Instant::now();
        let cache = travel.recommender().cache().clone();
        let metrics_collector = Arc::new(MetricsCollector::new(
            start_time,
            crate::metrics::metrics_handle(),
        ));

        Self {
            config,
            travel,
            intake,
            sessions: SessionStore::new(),
            cache,
            start_time,
            metrics_collector,
        }
    }

    /// Build every provider and the language model from configuration.
    pub fn from_config(config: Arc<AtlasConfig>, maps_api_key: String) -> Result<Self, AgentError> {
        let client = Arc::new(
            reqwest::Client::builder()
                .timeout(Duration::from_secs(config.server.request_timeout_seconds))
                .pool_max_idle_per_host(10)
                .build()
                .map_err(|e| AgentError::Configuration(format!("HTTP client: {}", e)))?,
        );

        let model = create_model(&config.llm, client.clone())?;
        let cache = Arc::new(RecommendationCache::new());
        let travel = TravelInfo::from_config(
            &config,
            maps_api_key,
            client,
            model.clone(),
            cache,
        );

        let extraction: Arc<dyn ExtractionOracle> = match &model {
            Some(model) => Arc::new(LlmExtractionOracle::new(model.clone(), config.llm.timeout())),
            None => Arc::new(DisabledOracle),
        };
        let mut intake = Intake::new(extraction)
            .with_conversation_logging(config.logging.log_conversation);
        if let Some(model) = model {
            tracing::info!(model = %model.name(), chat_model = %config.llm.chat_model, "Language model configured");
            intake = intake.with_chat(
                model,
                Some(config.llm.chat_model.clone()),
                config.llm.chat_temperature,
                config.llm.timeout(),
            );
        }

        Ok(Self::new(config, travel, intake))
    }

    /// Whether a language model backs the chat reply.
    pub fn llm_configured(&self) -> bool {
        self.intake.has_chat()
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let body_limit = server.max_body_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = cors_layer(&server.cors_origins);

    Router::new()
        .route("/api/chat", post(chat::handle_chat))
        .route("/api/stream", get(chat::handle_stream))
        .route("/api/reset", get(chat::handle_reset))
        .route("/api/attractions", post(attractions::handle))
        .route("/api/nearby/:coordinates", get(travel::handle_nearby))
        .route("/api/routes", post(travel::handle_routes))
        .route("/api/weather", post(travel::handle_weather))
        .route("/api/cars", post(travel::handle_cars))
        .route("/api/fuel", get(travel::handle_fuel))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
