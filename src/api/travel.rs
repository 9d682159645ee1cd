//! Travel data endpoints: restaurants, routes, weather, cars and fuel.

use crate::api::{
    ApiError, AppState, CarsRequest, CarsResponse, FuelQuery, FuelResponse, NearbyQuery,
    RoutesRequest, RoutesResponse, WeatherRequest,
};
use crate::geo::LatLng;
use crate::travel::{CarQuery, NearbyPlaces, WeatherReport};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;

const MAX_FORECAST_DAYS: u32 = 16;

fn parse_date(param: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::invalid_param(
            param,
            &format!("Invalid date '{}'; expected YYYY-MM-DD", value),
        )
    })
}

fn require(param: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_param(
            param,
            &format!("{} cannot be empty", param),
        ));
    }
    Ok(())
}

/// GET /api/nearby/{lat},{lng} - Best-rated restaurants around a point.
pub async fn handle_nearby(
    State(state): State<Arc<AppState>>,
    Path(coordinates): Path<String>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyPlaces>, ApiError> {
    let location: LatLng = coordinates.parse().map_err(|_| {
        ApiError::invalid_param(
            "coordinates",
            &format!("Invalid coordinates: '{}'", coordinates),
        )
    })?;
    let radius = query.radius.unwrap_or(state.travel.limits().nearby_radius);

    Ok(Json(state.travel.nearby_restaurants(location, radius).await))
}

/// POST /api/routes - Routes per travel mode, or an optimized route through waypoints.
pub async fn handle_routes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RoutesRequest>,
) -> Result<Json<RoutesResponse>, ApiError> {
    require("origin", &request.origin)?;
    require("destination", &request.destination)?;

    let waypoints: Vec<String> = request
        .waypoints
        .into_iter()
        .filter(|w| !w.trim().is_empty())
        .collect();

    let response = if waypoints.is_empty() {
        RoutesResponse {
            routes: state
                .travel
                .plan_routes(&request.origin, &request.destination)
                .await,
            optimized: None,
        }
    } else {
        RoutesResponse {
            routes: Vec::new(),
            optimized: state
                .travel
                .plan_with_waypoints(
                    &request.origin,
                    &request.destination,
                    &waypoints,
                    request.mode,
                )
                .await,
        }
    };

    Ok(Json(response))
}

/// POST /api/weather - Daily forecast for a city or point.
pub async fn handle_weather(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<WeatherReport>, ApiError> {
    if request.days == 0 || request.days > MAX_FORECAST_DAYS {
        return Err(ApiError::invalid_param(
            "days",
            &format!("days must be between 1 and {}", MAX_FORECAST_DAYS),
        ));
    }
    let start = match request.start_date.as_deref() {
        Some(date) => parse_date("start_date", date)?,
        None => chrono::Local::now().date_naive(),
    };

    let location = match (request.location, request.city.as_deref()) {
        (Some(point), _) => point,
        (None, Some(city)) if !city.trim().is_empty() => state.travel.city_to_location(city).await,
        _ => {
            return Err(ApiError::bad_request(
                "Either a city or a location is required",
            ))
        }
    };

    Ok(Json(
        state
            .travel
            .weather(location, start, request.days, request.summary)
            .await,
    ))
}

/// POST /api/cars - Rental-car offers for a date range.
pub async fn handle_cars(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CarsRequest>,
) -> Result<Json<CarsResponse>, ApiError> {
    require("location", &request.location)?;
    let start = parse_date("start_date", &request.start_date)?;
    let end = parse_date("end_date", &request.end_date)?;
    if end < start {
        return Err(ApiError::invalid_param(
            "end_date",
            "end_date must not be before start_date",
        ));
    }

    let mut query = CarQuery::new(request.location, start, end);
    if let Some(age) = request.driver_age {
        query.driver_age = age;
    }
    if let Some(top_n) = request.top_n {
        query.top_n = top_n;
    }
    query.min_price = request.min_price;
    query.max_price = request.max_price;

    Ok(Json(CarsResponse {
        cars: state.travel.car_rentals(&query).await,
    }))
}

/// GET /api/fuel?location=... - Gasoline price for a location.
pub async fn handle_fuel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FuelQuery>,
) -> Result<Json<FuelResponse>, ApiError> {
    require("location", &query.location)?;
    let price = state.travel.fuel_price(&query.location).await;

    Ok(Json(FuelResponse {
        location: query.location,
        price,
        currency: "USD",
    }))
}
