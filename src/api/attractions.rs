//! Attraction recommendations endpoint.

use crate::api::{ApiError, AppState, AttractionsRequest, AttractionsResponse, MapPoint};
use crate::slots::{SlotField, SlotRecord, StartDate};
use crate::travel::AttractionQuery;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

/// Forecast days fetched for ranking context.
const DEFAULT_WEATHER_DAYS: u32 = 3;
const MAX_WEATHER_DAYS: u32 = 16;

/// POST /api/attractions - Ranked attractions for the traveller's city.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AttractionsRequest>,
) -> Result<Json<AttractionsResponse>, ApiError> {
    let mut preferences = match request.session_id.as_deref() {
        Some(id) => {
            let handle = state
                .sessions
                .get(id)
                .ok_or_else(|| ApiError::session_not_found(id))?;
            let session = handle.lock().await;
            session.slots.clone()
        }
        None => SlotRecord::new(),
    };
    if let Some(extra) = &request.preferences {
        preferences.merge(extra);
    }

    let city = request
        .city
        .clone()
        .or_else(|| preferences.get_text(SlotField::City))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::invalid_param("city", "A city is required"))?;

    let limits = state.travel.limits();
    let number = request.number.unwrap_or(limits.default_number);
    if number == 0 {
        return Err(ApiError::invalid_param("number", "number must be at least 1"));
    }
    let query = AttractionQuery {
        number,
        place_type: request
            .poi_type
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| AttractionQuery::default().place_type),
        sort: request.sort_by.unwrap_or_default(),
        radius: request.radius.unwrap_or(limits.default_radius),
    };

    let location = state.travel.city_to_location(&city).await;

    let weather_summary = if request.include_weather {
        let start = match preferences.start_date() {
            StartDate::Date(date) => date,
            _ => chrono::Local::now().date_naive(),
        };
        let days = preferences
            .days()
            .unwrap_or(DEFAULT_WEATHER_DAYS)
            .clamp(1, MAX_WEATHER_DAYS);
        state
            .travel
            .weather(location, start, days, true)
            .await
            .summary
    } else {
        None
    };

    let attractions = state
        .travel
        .attractions(
            location,
            Some(&city),
            &preferences,
            weather_summary.as_deref(),
            &query,
        )
        .await;

    info!(
        city = %city,
        returned = attractions.len(),
        sort = ?query.sort,
        weather = weather_summary.is_some(),
        "Attractions recommended"
    );

    let map_data = attractions.iter().map(MapPoint::from).collect();
    Ok(Json(AttractionsResponse {
        city,
        location,
        attractions,
        map_data,
        weather_summary,
    }))
}
