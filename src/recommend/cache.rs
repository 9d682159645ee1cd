//! Content-addressed memo of ranking oracle answers.
//!
//! Keys are SHA-256 digests over the canonicalized preference record, the
//! sorted candidate id set and the weather summary, so the same semantic
//! inputs always land on the same entry regardless of ordering.
//!
//! The cache lives for the process lifetime and never evicts. Growth is
//! bounded only by the number of distinct (preferences, candidates, weather)
//! combinations seen; [`RecommendationCache::len`] is exposed on `/health`.

use crate::slots::SlotRecord;
use dashmap::DashMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a ranking request.
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas::recommend::CacheKey;
    /// use atlas::slots::SlotRecord;
    ///
    /// let prefs = SlotRecord::new();
    /// let a = CacheKey::derive(&prefs, ["a", "b"], Some("sunny"));
    /// let b = CacheKey::derive(&prefs, ["b", "a"], Some("sunny"));
    /// assert_eq!(a, b);
    /// ```
    pub fn derive<'a, I>(preferences: &SlotRecord, candidate_ids: I, weather: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let prefs = canonical_json(&preferences.to_json());

        let mut ids: Vec<&str> = candidate_ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        let ids = Value::from(ids).to_string();

        let weather = weather.unwrap_or("");

        let mut hasher = Sha256::new();
        hasher.update(format!("{}-{}-{}", prefs, ids, weather).as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize with object keys sorted at every depth.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let body: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::from(k.as_str()), canonical_json(v)))
                .collect();
            format!("{{{}}}", body.join(","))
        }
        Value::Array(items) => {
            let body: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", body.join(","))
        }
        other => other.to_string(),
    }
}

/// Process-lifetime cache of oracle orderings.
///
/// Safe to share across sessions: writes for one key are last-write-wins and
/// a race between two misses only repeats the oracle call.
#[derive(Debug, Default)]
pub struct RecommendationCache {
    entries: DashMap<CacheKey, Vec<String>>,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<String>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: CacheKey, ranked_ids: Vec<String>) {
        self.entries.insert(key, ranked_ids);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SlotField;
    use serde_json::json;

    fn prefs(pairs: &[(SlotField, Value)]) -> SlotRecord {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_key_is_order_independent_over_ids() {
        let p = prefs(&[(SlotField::City, json!("Paris"))]);
        assert_eq!(
            CacheKey::derive(&p, ["a", "b"], Some("rain")),
            CacheKey::derive(&p, ["b", "a"], Some("rain"))
        );
    }

    #[test]
    fn test_key_is_order_independent_over_preferences() {
        let p1 = prefs(&[
            (SlotField::City, json!("Paris")),
            (SlotField::Hobbies, json!({"outdoor": "hiking", "indoor": "museums"})),
        ]);
        let p2 = prefs(&[
            (SlotField::Hobbies, json!({"indoor": "museums", "outdoor": "hiking"})),
            (SlotField::City, json!("Paris")),
        ]);
        assert_eq!(
            CacheKey::derive(&p1, ["a"], None),
            CacheKey::derive(&p2, ["a"], None)
        );
    }

    #[test]
    fn test_key_distinguishes_inputs() {
        let p = prefs(&[(SlotField::City, json!("Paris"))]);
        let base = CacheKey::derive(&p, ["a", "b"], Some("rain"));

        assert_ne!(base, CacheKey::derive(&p, ["a", "c"], Some("rain")));
        assert_ne!(base, CacheKey::derive(&p, ["a", "b"], Some("sun")));
        assert_ne!(
            base,
            CacheKey::derive(&prefs(&[(SlotField::City, json!("Rome"))]), ["a", "b"], Some("rain"))
        );
    }

    #[test]
    fn test_missing_weather_equals_empty_weather() {
        let p = SlotRecord::new();
        assert_eq!(
            CacheKey::derive(&p, ["a"], None),
            CacheKey::derive(&p, ["a"], Some(""))
        );
    }

    #[test]
    fn test_key_is_sha256_hex() {
        let key = CacheKey::derive(&SlotRecord::new(), ["a"], None);
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_put_get_overwrite() {
        let cache = RecommendationCache::new();
        let key = CacheKey::derive(&SlotRecord::new(), ["a", "b"], None);
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), vec!["b".into(), "a".into()]);
        cache.put(key.clone(), vec!["b".into(), "a".into()]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some(vec!["b".to_string(), "a".to_string()]));

        cache.put(key.clone(), vec!["a".into()]);
        assert_eq!(cache.get(&key), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        assert_eq!(
            canonical_json(&json!({"b": 1, "a": {"d": [1, {"z": 0, "y": 1}], "c": null}})),
            r#"{"a":{"c":null,"d":[1,{"y":1,"z":0}]},"b":1}"#
        );
    }
}
