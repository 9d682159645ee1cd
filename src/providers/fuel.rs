//! Fuel-price adapter (CollectAPI gas prices).

use super::{fetch_json, FuelPriceProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub struct CollectApiFuel {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: Arc<Client>,
}

impl CollectApiFuel {
    pub fn new(base_url: String, api_key: String, timeout: Duration, client: Arc<Client>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<PriceResult>,
}

#[derive(Debug, Deserialize)]
struct PriceResult {
    /// Number or numeric string, USD per gallon.
    #[serde(default)]
    gasoline: Value,
}

fn as_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    }?;
    (price.is_finite() && price > 0.0).then_some(price)
}

#[async_trait]
impl FuelPriceProvider for CollectApiFuel {
    async fn price(&self, location: &str) -> Result<Option<f64>, ProviderError> {
        let url = format!("{}/gasPrice/fromCity", self.base_url);
        let request = self
            .client
            .get(&url)
            .header("authorization", format!("apikey {}", self.api_key))
            .query(&[("city", location)]);

        let response: PriceResponse = fetch_json(request, self.timeout).await?;
        if !response.success {
            return Ok(None);
        }
        Ok(response.result.and_then(|r| as_price(&r.gasoline)))
    }
}
