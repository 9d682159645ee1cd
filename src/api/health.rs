//! Health check endpoint handler.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub sessions: usize,
    /// Entries in the ranking cache, which grows for the life of the process.
    pub cache_entries: usize,
    pub llm_configured: bool,
}

/// GET /health - Return service health and state counts.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        sessions: state.sessions.len(),
        cache_entries: state.cache.len(),
        llm_configured: state.llm_configured(),
    })
}
