//! RapidAPI car-rental search adapter.

use super::types::{CarOffer, CarSearch};
use super::{fetch_json, CarRentalProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Car-rental search through RapidAPI (`x-rapidapi-key` authentication).
pub struct RapidApiCarRental {
    base_url: String,
    host: String,
    api_key: String,
    timeout: Duration,
    client: Arc<Client>,
}

impl RapidApiCarRental {
    pub fn new(
        base_url: String,
        host: String,
        api_key: String,
        timeout: Duration,
        client: Arc<Client>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            api_key,
            timeout,
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    search_results: Vec<WireOffer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireOffer {
    vehicle_info: WireVehicle,
    pricing_info: WirePricing,
    route_info: WireRouteInfo,
    supplier_info: WireNamed,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireVehicle {
    v_name: Option<String>,
    group: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePricing {
    price: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireRouteInfo {
    pickup: WireNamed,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireNamed {
    name: Option<String>,
}

impl WireOffer {
    /// Offers without a model or a price are not shown.
    fn into_offer(self, default_currency: &str) -> Option<CarOffer> {
        Some(CarOffer {
            car_model: self.vehicle_info.v_name?,
            car_group: self.vehicle_info.group.unwrap_or_default(),
            price: self.pricing_info.price?,
            currency: self
                .pricing_info
                .currency
                .unwrap_or_else(|| default_currency.to_string()),
            pickup_location_name: self.route_info.pickup.name.unwrap_or_default(),
            supplier_name: self.supplier_info.name.unwrap_or_default(),
            image_url: self.vehicle_info.image_url,
        })
    }
}

#[async_trait]
impl CarRentalProvider for RapidApiCarRental {
    async fn search(&self, search: &CarSearch) -> Result<Vec<CarOffer>, ProviderError> {
        let url = format!("{}/api/v1/cars/searchCarRentals", self.base_url);
        let lat = search.location.lat.to_string();
        let lng = search.location.lng.to_string();
        let query: [(&str, String); 10] = [
            ("pick_up_latitude", lat.clone()),
            ("pick_up_longitude", lng.clone()),
            ("drop_off_latitude", lat),
            ("drop_off_longitude", lng),
            ("pick_up_date", search.pickup_date.format("%Y-%m-%d").to_string()),
            ("drop_off_date", search.dropoff_date.format("%Y-%m-%d").to_string()),
            ("pick_up_time", search.time.clone()),
            ("drop_off_time", search.time.clone()),
            ("driver_age", search.driver_age.to_string()),
            ("currency_code", search.currency.clone()),
        ];
        let request = self
            .client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(&query);

        let response: SearchResponse = fetch_json(request, self.timeout).await?;
        if response.status == Some(false) {
            return Err(ProviderError::Api(
                response
                    .message
                    .unwrap_or_else(|| "car search failed".to_string()),
            ));
        }

        Ok(response
            .data
            .unwrap_or_default()
            .search_results
            .into_iter()
            .filter_map(|offer| offer.into_offer(&search.currency))
            .collect())
    }
}
