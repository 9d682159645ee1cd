//! End-to-end recommendation pipeline over stub providers.

mod common;

use atlas::travel::{AttractionQuery, DEFAULT_LOCATION};
use common::{
    ids, paris_request, travel_with, DownPlaces, FailingRanker, ReversingRanker, StubPlaces,
    PARIS,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_rerank_applies_after_local_sort_and_is_cached() {
    let ranker = Arc::new(ReversingRanker::default());
    let travel = travel_with(Arc::new(StubPlaces), ranker.clone());
    let query = AttractionQuery::default();
    let prefs = paris_request();

    let first = travel
        .attractions(PARIS, Some("Paris"), &prefs, None, &query)
        .await;
    // rating order is orsay, louvre, tower; the oracle reverses it
    assert_eq!(ids(&first), vec!["tower", "louvre", "orsay"]);
    assert_eq!(ranker.calls(), 1);

    let second = travel
        .attractions(PARIS, Some("Paris"), &prefs, None, &query)
        .await;
    assert_eq!(ids(&second), ids(&first));
    assert_eq!(ranker.calls(), 1);
    assert_eq!(travel.recommender().cache().len(), 1);
}

#[tokio::test]
async fn test_weather_changes_cache_key() {
    let ranker = Arc::new(ReversingRanker::default());
    let travel = travel_with(Arc::new(StubPlaces), ranker.clone());
    let query = AttractionQuery::default();
    let prefs = paris_request();

    travel
        .attractions(PARIS, Some("Paris"), &prefs, Some("sunny"), &query)
        .await;
    travel
        .attractions(PARIS, Some("Paris"), &prefs, Some("rain all week"), &query)
        .await;
    assert_eq!(ranker.calls(), 2);
    assert_eq!(travel.recommender().cache().len(), 2);
}

#[tokio::test]
async fn test_empty_preferences_skip_oracle() {
    let ranker = Arc::new(ReversingRanker::default());
    let travel = travel_with(Arc::new(StubPlaces), ranker.clone());

    let result = travel
        .attractions(
            PARIS,
            Some("Paris"),
            &atlas::slots::SlotRecord::new(),
            None,
            &AttractionQuery::default(),
        )
        .await;
    assert_eq!(ids(&result), vec!["orsay", "louvre", "tower"]);
    assert_eq!(ranker.calls(), 0);
}

#[tokio::test]
async fn test_oracle_failure_keeps_local_order_and_retries() {
    let ranker = Arc::new(FailingRanker::default());
    let travel = travel_with(Arc::new(StubPlaces), ranker.clone());
    let query = AttractionQuery {
        number: 2,
        ..AttractionQuery::default()
    };
    let prefs = paris_request();

    for _ in 0..2 {
        let result = travel
            .attractions(PARIS, Some("Paris"), &prefs, None, &query)
            .await;
        assert_eq!(ids(&result), vec!["orsay", "louvre"]);
    }
    assert_eq!(ranker.calls.load(Ordering::SeqCst), 2);
    assert!(travel.recommender().cache().is_empty());
}

#[tokio::test]
async fn test_provider_outage_uses_fallback_attractions() {
    let ranker = Arc::new(ReversingRanker::default());
    let travel = travel_with(Arc::new(DownPlaces), ranker.clone());

    let location = travel.city_to_location("Medellín").await;
    assert_eq!(location, DEFAULT_LOCATION);

    let result = travel
        .attractions(
            location,
            Some("Medellín"),
            &paris_request(),
            None,
            &AttractionQuery::default(),
        )
        .await;
    assert_eq!(result.len(), 5);
    assert!(result.iter().all(|c| c.is_fallback()));
    assert_eq!(ranker.calls(), 1);
}

#[tokio::test]
async fn test_provider_outage_elsewhere_uses_city_center() {
    let travel = travel_with(
        Arc::new(DownPlaces),
        Arc::new(atlas::oracle::DisabledOracle),
    );

    let location = travel.city_to_location("Reykjavik").await;
    let result = travel
        .attractions(
            location,
            Some("Reykjavik"),
            &paris_request(),
            None,
            &AttractionQuery::default(),
        )
        .await;
    assert_eq!(result.len(), 1);
    assert!(result[0].is_fallback());
}
