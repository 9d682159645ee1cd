//! Property tests for ranking merges and cache keys.

mod common;

use atlas::recommend::{merge_ranked, CacheKey};
use atlas::slots::{SlotField, SlotRecord};
use common::{ids, make_candidates};
use proptest::prelude::*;
use serde_json::json;

fn id_pool() -> Vec<String> {
    (0..12).map(|i| format!("p{}", i)).collect()
}

/// Distinct candidate ids, in arbitrary order.
fn candidate_ids() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(id_pool(), 0..12).prop_shuffle()
}

/// Oracle answers: known and unknown ids, possibly repeated.
fn oracle_answer() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        prop_oneof![
            proptest::sample::select(id_pool()),
            "[q-z][0-9]".prop_map(String::from),
        ],
        0..20,
    )
}

proptest! {
    #[test]
    fn prop_merge_is_permutation(original in candidate_ids(), answer in oracle_answer()) {
        let refs: Vec<&str> = original.iter().map(String::as_str).collect();
        let merged = merge_ranked(make_candidates(&refs), &answer);

        let mut got: Vec<&str> = ids(&merged);
        let mut want = refs.clone();
        got.sort_unstable();
        want.sort_unstable();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_merge_follows_first_mentions(original in candidate_ids(), answer in oracle_answer()) {
        let refs: Vec<&str> = original.iter().map(String::as_str).collect();
        let merged = merge_ranked(make_candidates(&refs), &answer);

        let mut mentioned: Vec<&str> = Vec::new();
        for id in &answer {
            if refs.contains(&id.as_str()) && !mentioned.contains(&id.as_str()) {
                mentioned.push(id.as_str());
            }
        }
        let merged_ids = ids(&merged);
        prop_assert_eq!(&merged_ids[..mentioned.len()], &mentioned[..]);

        // unmentioned candidates keep their relative order
        let rest: Vec<&str> = refs
            .iter()
            .copied()
            .filter(|id| !mentioned.contains(id))
            .collect();
        prop_assert_eq!(&merged_ids[mentioned.len()..], &rest[..]);
    }

    #[test]
    fn prop_cache_key_ignores_candidate_order(original in candidate_ids(), weather in proptest::option::of("[a-z ]{0,12}")) {
        let prefs: SlotRecord = [(SlotField::Hobbies, json!("museums"))].into_iter().collect();
        let mut reversed = original.clone();
        reversed.reverse();

        let a = CacheKey::derive(&prefs, original.iter().map(String::as_str), weather.as_deref());
        let b = CacheKey::derive(&prefs, reversed.iter().map(String::as_str), weather.as_deref());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_cache_key_ignores_preference_insertion_order(city in "[A-Z][a-z]{2,8}", hobbies in "[a-z]{3,10}") {
        let forward: SlotRecord = [
            (SlotField::City, json!(city.clone())),
            (SlotField::Hobbies, json!(hobbies.clone())),
        ]
        .into_iter()
        .collect();
        let backward: SlotRecord = [
            (SlotField::Hobbies, json!(hobbies)),
            (SlotField::City, json!(city)),
        ]
        .into_iter()
        .collect();

        prop_assert_eq!(
            CacheKey::derive(&forward, ["a", "b"], None),
            CacheKey::derive(&backward, ["a", "b"], None)
        );
    }
}

#[test]
fn test_cache_key_distinguishes_inputs() {
    let prefs: SlotRecord = [(SlotField::City, json!("Paris"))].into_iter().collect();
    let base = CacheKey::derive(&prefs, ["a", "b"], Some("sunny"));

    assert_ne!(base, CacheKey::derive(&prefs, ["a", "c"], Some("sunny")));
    assert_ne!(base, CacheKey::derive(&prefs, ["a", "b"], Some("rain")));
    assert_ne!(base, CacheKey::derive(&SlotRecord::new(), ["a", "b"], Some("sunny")));
    assert_eq!(base.as_str().len(), 64);
}
