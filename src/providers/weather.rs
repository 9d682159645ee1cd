//! Open-Meteo daily forecast adapter.

use super::types::DailyForecast;
use super::{fetch_json, ProviderError, WeatherProvider};
use crate::geo::LatLng;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,\
wind_speed_10m_max,precipitation_probability_max,uv_index_max";

/// Client for the Open-Meteo forecast API. Needs no key.
pub struct OpenMeteo {
    base_url: String,
    timeout: Duration,
    client: Arc<Client>,
}

impl OpenMeteo {
    pub fn new(base_url: String, timeout: Duration, client: Arc<Client>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<Daily>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Daily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    precipitation_probability_max: Vec<Option<f64>>,
    uv_index_max: Vec<Option<f64>>,
}

fn format_value(values: &[Option<f64>], i: usize, unit: &str) -> String {
    match values.get(i).copied().flatten() {
        Some(v) => format!("{}{}", round1(v), unit),
        None => "N/A".to_string(),
    }
}

/// One decimal place, without a trailing ".0".
fn round1(v: f64) -> String {
    let rounded = (v * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

impl Daily {
    fn into_forecasts(self) -> Vec<DailyForecast> {
        (0..self.time.len())
            .map(|i| DailyForecast {
                date: self.time[i].clone(),
                max_temp: format_value(&self.temperature_2m_max, i, " °C"),
                min_temp: format_value(&self.temperature_2m_min, i, " °C"),
                precipitation: format_value(&self.precipitation_sum, i, " mm"),
                wind_speed: format_value(&self.wind_speed_10m_max, i, " km/h"),
                precipitation_probability: format_value(&self.precipitation_probability_max, i, "%"),
                uv_index: format_value(&self.uv_index_max, i, ""),
            })
            .collect()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteo {
    async fn forecast(
        &self,
        location: LatLng,
        start_date: NaiveDate,
        days: u32,
    ) -> Result<Vec<DailyForecast>, ProviderError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let end_date = start_date + ChronoDuration::days(i64::from(days) - 1);

        let url = format!("{}/v1/forecast", self.base_url);
        let request = self.client.get(&url).query(&[
            ("latitude", location.lat.to_string()),
            ("longitude", location.lng.to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
        ]);

        let response: ForecastResponse = fetch_json(request, self.timeout).await?;
        Ok(response
            .daily
            .map(Daily::into_forecasts)
            .unwrap_or_default())
    }
}
