//! Google Maps Platform adapter: geocoding, places and directions.

use super::types::{Leg, PhotoRef, PlaceDetails, RawPlace, Route, TravelMode};
use super::{fetch_json, PlacesProvider, ProviderError, RoutingProvider};
use crate::geo::{LatLng, Location};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DETAIL_FIELDS: &str = "name,rating,price_level,opening_hours,formatted_address,\
geometry/location,place_id,user_ratings_total,website,editorial_summary,business_status";

/// Client for the Google Maps web services.
pub struct GoogleMaps {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: Arc<Client>,
}

impl GoogleMaps {
    pub fn new(base_url: String, api_key: String, timeout: Duration, client: Arc<Client>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            client,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())]);
        fetch_json(request, self.timeout).await
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(flatten)]
    body: T,
}

impl<T> Envelope<T> {
    /// `Ok(None)` for "no results", `Ok(Some)` for results, `Err` otherwise.
    fn into_result(self) -> Result<Option<T>, ProviderError> {
        match self.status.as_str() {
            "OK" => Ok(Some(self.body)),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            other => Err(ProviderError::Api(match self.error_message {
                Some(msg) => format!("{}: {}", other, msg),
                None => other.to_string(),
            })),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireGeometry {
    #[serde(default)]
    location: WireLatLng,
}

/// Lat/lng kept as raw JSON so non-numeric values can be nulled.
#[derive(Debug, Default, Deserialize)]
struct WireLatLng {
    #[serde(default)]
    lat: Value,
    #[serde(default)]
    lng: Value,
}

impl WireLatLng {
    fn to_location(&self) -> Location {
        Location::sanitized(self.lat.as_f64(), self.lng.as_f64())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeBody {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    geometry: WireGeometry,
}

#[derive(Debug, Deserialize)]
struct NearbyBody {
    #[serde(default)]
    results: Vec<WirePlace>,
}

#[derive(Debug, Deserialize)]
struct WirePlace {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    geometry: WireGeometry,
    #[serde(default)]
    photos: Vec<WirePhoto>,
}

#[derive(Debug, Deserialize)]
struct WirePhoto {
    #[serde(default)]
    photo_reference: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DetailsBody {
    #[serde(default)]
    result: Option<WireDetails>,
}

#[derive(Debug, Deserialize)]
struct WireDetails {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    opening_hours: Option<WireOpeningHours>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: WireGeometry,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    editorial_summary: Option<WireEditorial>,
}

#[derive(Debug, Deserialize)]
struct WireOpeningHours {
    #[serde(default)]
    weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireEditorial {
    #[serde(default)]
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsBody {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    #[serde(default)]
    legs: Vec<WireLeg>,
    #[serde(default)]
    waypoint_order: Vec<usize>,
    #[serde(default)]
    fare: Option<WireText>,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    distance: WireTextValue,
    duration: WireTextValue,
    #[serde(default)]
    duration_in_traffic: Option<WireTextValue>,
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
}

#[derive(Debug, Deserialize)]
struct WireTextValue {
    #[serde(default)]
    text: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct WireText {
    #[serde(default)]
    text: Option<String>,
}

impl WirePlace {
    /// Places without an id cannot be looked up and are dropped.
    fn into_raw(self) -> Option<RawPlace> {
        Some(RawPlace {
            place_id: self.place_id.filter(|id| !id.is_empty())?,
            name: self.name,
            rating: self.rating,
            price_level: self.price_level,
            types: self.types,
            location: self.geometry.location.to_location(),
            photos: self
                .photos
                .into_iter()
                .filter_map(|p| {
                    Some(PhotoRef {
                        reference: p.photo_reference.filter(|r| !r.is_empty())?,
                        width: p.width,
                        height: p.height,
                    })
                })
                .collect(),
        })
    }
}

impl From<WireRoute> for Route {
    fn from(route: WireRoute) -> Self {
        Route {
            legs: route
                .legs
                .into_iter()
                .map(|leg| Leg {
                    distance_text: leg.distance.text,
                    duration_text: leg.duration.text,
                    distance_meters: leg.distance.value,
                    duration_seconds: leg.duration.value,
                    duration_in_traffic_seconds: leg.duration_in_traffic.map(|d| d.value),
                    start_address: leg.start_address,
                    end_address: leg.end_address,
                })
                .collect(),
            waypoint_order: route.waypoint_order,
            fare: route.fare.and_then(|f| f.text),
        }
    }
}

fn first_route(body: Option<DirectionsBody>) -> Option<Route> {
    body?
        .routes
        .into_iter()
        .next()
        .map(Route::from)
        .filter(|route| !route.legs.is_empty())
}

// ============================================================================
// Provider implementations
// ============================================================================

#[async_trait]
impl PlacesProvider for GoogleMaps {
    async fn geocode(&self, query: &str) -> Result<Option<LatLng>, ProviderError> {
        let envelope: Envelope<GeocodeBody> = self
            .get("/maps/api/geocode/json", &[("address", query.to_string())])
            .await?;

        Ok(envelope.into_result()?.and_then(|body| {
            body.results
                .into_iter()
                .next()
                .and_then(|r| r.geometry.location.to_location().to_lat_lng())
        }))
    }

    async fn nearby(
        &self,
        location: LatLng,
        radius: u32,
        place_type: &str,
    ) -> Result<Vec<RawPlace>, ProviderError> {
        let envelope: Envelope<NearbyBody> = self
            .get(
                "/maps/api/place/nearbysearch/json",
                &[
                    ("location", location.to_string()),
                    ("radius", radius.to_string()),
                    ("type", place_type.to_string()),
                    ("language", "en".to_string()),
                ],
            )
            .await?;

        Ok(envelope
            .into_result()?
            .map(|body| {
                body.results
                    .into_iter()
                    .filter_map(WirePlace::into_raw)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        let envelope: Envelope<DetailsBody> = self
            .get(
                "/maps/api/place/details/json",
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", DETAIL_FIELDS.to_string()),
                    ("language", "en".to_string()),
                ],
            )
            .await?;

        Ok(envelope
            .into_result()?
            .and_then(|body| body.result)
            .map(|d| PlaceDetails {
                name: d.name,
                rating: d.rating,
                user_ratings_total: d.user_ratings_total,
                price_level: d.price_level,
                opening_hours: d.opening_hours.and_then(|h| h.weekday_text),
                address: d.formatted_address,
                location: d.geometry.location.to_location(),
                website: d.website,
                overview: d
                    .editorial_summary
                    .and_then(|e| e.overview)
                    .filter(|o| !o.trim().is_empty()),
            }))
    }

    fn photo_url(&self, reference: &str, max_width: u32) -> Option<String> {
        if reference.is_empty() {
            return None;
        }
        Some(format!(
            "{}/maps/api/place/photo?maxwidth={}&photoreference={}&key={}",
            self.base_url, max_width, reference, self.api_key
        ))
    }
}

#[async_trait]
impl RoutingProvider for GoogleMaps {
    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<Option<Route>, ProviderError> {
        let envelope: Envelope<DirectionsBody> = self
            .get(
                "/maps/api/directions/json",
                &[
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                    ("mode", mode.to_string()),
                    ("language", "en".to_string()),
                ],
            )
            .await?;
        Ok(first_route(envelope.into_result()?))
    }

    async fn optimized(
        &self,
        origin: &str,
        destination: &str,
        waypoints: &[String],
        mode: TravelMode,
    ) -> Result<Option<Route>, ProviderError> {
        let waypoints = format!("optimize:true|{}", waypoints.join("|"));
        let envelope: Envelope<DirectionsBody> = self
            .get(
                "/maps/api/directions/json",
                &[
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                    ("waypoints", waypoints),
                    ("mode", mode.to_string()),
                    ("departure_time", "now".to_string()),
                    ("language", "en".to_string()),
                ],
            )
            .await?;
        Ok(first_route(envelope.into_result()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn maps(url: String) -> GoogleMaps {
        GoogleMaps::new(
            url,
            "test-key".to_string(),
            Duration::from_secs(5),
            Arc::new(Client::new()),
        )
    }

    #[tokio::test]
    async fn test_geocode() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), "Paris".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"status":"OK","results":[{"geometry":{"location":{"lat":48.85,"lng":2.35}}}]}"#)
            .create_async()
            .await;

        let point = maps(server.url()).geocode("Paris").await.unwrap();
        mock.assert_async().await;
        assert_eq!(point, Some(LatLng::new(48.85, 2.35)));
    }

    #[tokio::test]
    async fn test_geocode_zero_results() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"ZERO_RESULTS","results":[]}"#)
            .create_async()
            .await;

        assert_eq!(maps(server.url()).geocode("Atlantis").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_request_denied_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/place/nearbysearch/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"REQUEST_DENIED","error_message":"bad key","results":[]}"#)
            .create_async()
            .await;

        let err = maps(server.url())
            .nearby(LatLng::new(0.0, 0.0), 100, "restaurant")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api(ref m) if m.contains("bad key")));
    }

    #[tokio::test]
    async fn test_nearby_skips_places_without_id_and_nulls_bad_coordinates() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/place/nearbysearch/json")
            .match_query(Matcher::UrlEncoded("type".into(), "tourist_attraction".into()))
            .with_status(200)
            .with_body(
                r#"{"status":"OK","results":[
                    {"place_id":"p1","name":"Louvre","rating":4.7,"types":["museum","point_of_interest"],
                     "geometry":{"location":{"lat":"north","lng":2.33}},
                     "photos":[{"photo_reference":"ref1","width":800,"height":600}]},
                    {"name":"No id"}
                ]}"#,
            )
            .create_async()
            .await;

        let places = maps(server.url())
            .nearby(LatLng::new(48.85, 2.35), 10_000, "tourist_attraction")
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place_id, "p1");
        assert_eq!(places[0].location.lat, None);
        assert_eq!(places[0].location.lng, Some(2.33));
        assert_eq!(places[0].photos[0].reference, "ref1");
    }

    #[tokio::test]
    async fn test_details() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/place/details/json")
            .match_query(Matcher::UrlEncoded("place_id".into(), "p1".into()))
            .with_status(200)
            .with_body(
                r#"{"status":"OK","result":{"name":"Louvre","rating":4.7,"user_ratings_total":250000,
                    "opening_hours":{"weekday_text":["Monday: 9:00 AM – 6:00 PM"]},
                    "formatted_address":"Rue de Rivoli, Paris","geometry":{"location":{"lat":48.86,"lng":2.33}},
                    "editorial_summary":{"overview":"Former royal palace."}}}"#,
            )
            .create_async()
            .await;

        let details = maps(server.url()).details("p1").await.unwrap().unwrap();
        assert_eq!(details.name.as_deref(), Some("Louvre"));
        assert_eq!(details.user_ratings_total, Some(250_000));
        assert_eq!(details.overview.as_deref(), Some("Former royal palace."));
        assert_eq!(details.opening_hours.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_optimized_directions() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/maps/api/directions/json")
            .match_query(Matcher::UrlEncoded(
                "waypoints".into(),
                "optimize:true|B|C".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"status":"OK","routes":[{"waypoint_order":[1,0],"legs":[
                    {"distance":{"text":"1 km","value":1000},"duration":{"text":"2 mins","value":120},
                     "start_address":"A","end_address":"C"},
                    {"distance":{"text":"2 km","value":2000},"duration":{"text":"4 mins","value":240},
                     "start_address":"C","end_address":"B"}]}]}"#,
            )
            .create_async()
            .await;

        let route = maps(server.url())
            .optimized("A", "D", &["B".to_string(), "C".to_string()], TravelMode::Driving)
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(route.waypoint_order, vec![1, 0]);
        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.legs[1].distance_meters, 2000);
        assert_eq!(route.legs[0].duration_in_traffic_seconds, None);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/directions/json")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = maps(server.url())
            .directions("A", "B", TravelMode::Walking)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http { status: 503, .. }));
    }

    #[test]
    fn test_photo_url() {
        let url = maps("http://maps.test".to_string()).photo_url("abc", 400).unwrap();
        assert_eq!(
            url,
            "http://maps.test/maps/api/place/photo?maxwidth=400&photoreference=abc&key=test-key"
        );
        assert!(maps("http://maps.test".to_string()).photo_url("", 400).is_none());
    }
}
