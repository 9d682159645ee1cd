//! Attraction ranking backed by a language model.

use super::parse::parse_id_list;
use super::{OracleError, RankingOracle};
use crate::agent::{ChatMessage, CompletionRequest, LanguageModel};
use crate::recommend::Candidate;
use crate::slots::{SlotField, SlotRecord};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are an expert travel recommender. Your goal is to rank attractions \
based on user preferences, attraction details, and weather conditions. Ensure a good balance of \
attraction categories if appropriate.";

const NO_WEATHER: &str = "No specific weather summary provided.";

/// The part of a candidate the model sees.
#[derive(Debug, Serialize)]
struct RankingItem<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    description: &'a str,
    estimated_duration: f64,
    price_level: Option<u8>,
    rating: Option<f64>,
}

impl<'a> From<&'a Candidate> for RankingItem<'a> {
    fn from(c: &'a Candidate) -> Self {
        Self {
            id: &c.id,
            name: &c.name,
            category: &c.category,
            description: &c.description,
            estimated_duration: c.estimated_duration,
            price_level: c.price_level,
            rating: c.rating,
        }
    }
}

/// Asks the model for a most-to-least recommended list of candidate ids.
pub struct LlmRankingOracle {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl LlmRankingOracle {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }
}

fn pref_or(preferences: &SlotRecord, field: SlotField, default: &str) -> String {
    preferences
        .non_empty()
        .get_text(field)
        .unwrap_or_else(|| default.to_string())
}

/// User prompt for one ranking call.
pub fn ranking_prompt(
    preferences: &SlotRecord,
    candidates: &[Candidate],
    weather: Option<&str>,
) -> String {
    let items: Vec<RankingItem<'_>> = candidates.iter().map(RankingItem::from).collect();
    let items_json = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());
    let prefs_json = serde_json::to_string_pretty(&preferences.to_json())
        .unwrap_or_else(|_| "{}".to_string());
    let weather = weather.filter(|w| !w.trim().is_empty()).unwrap_or(NO_WEATHER);

    format!(
        r#"You are an expert travel recommender. Rank the provided list of attractions based on the user's preferences, the details of each attraction, and the weather summary.

User Preferences:
{prefs_json}

Weather Summary for the trip period:
{weather}

Attractions List (each with its original 'id', 'name', 'category', 'estimated_duration', 'price_level', 'rating' and a brief 'description'):
{items_json}

Consider the following factors for ranking:
1. User Hobbies & Interests: match the user's hobbies (e.g., '{hobbies}').
2. User Health & Accessibility: consider the user's health (e.g., '{health}') and attraction accessibility.
3. Suitability for Children: if traveling with kids (Kids: '{kids}'), prioritize child-friendly options.
4. Budget Constraints: align with the budget (e.g., '{budget}').
5. Weather Impact: prioritize indoor or outdoor activities based on the weather.
6. Category Balance: aim for diversity in the top recommendations, and filter out duplicates that are the same place listed differently.

Return a JSON list of attraction IDs, ranked from MOST to LEAST recommended.
The output MUST be a valid JSON list of strings (attraction IDs). For example:
["id1", "id2", "id3"]

Only return the JSON list of IDs. Do not include any other text or explanation."#,
        prefs_json = prefs_json,
        weather = weather,
        items_json = items_json,
        hobbies = pref_or(preferences, SlotField::Hobbies, "general sightseeing"),
        health = pref_or(preferences, SlotField::Health, "good"),
        kids = pref_or(preferences, SlotField::Kids, "no"),
        budget = pref_or(preferences, SlotField::Budget, "medium"),
    )
}

#[async_trait]
impl RankingOracle for LlmRankingOracle {
    async fn try_rank(
        &self,
        preferences: &SlotRecord,
        candidates: &[Candidate],
        weather: Option<&str>,
    ) -> Result<Vec<String>, OracleError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let request = CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(ranking_prompt(preferences, candidates, weather)),
        ]);

        tracing::debug!(
            model = %self.model.name(),
            candidates = candidates.len(),
            "Requesting ranking"
        );

        let reply = tokio::time::timeout(self.timeout, self.model.complete(request))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout.as_secs()))??;

        parse_id_list(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use serde_json::json;

    struct Fixed(&'static str);

    #[async_trait]
    impl LanguageModel for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, AgentError> {
            Ok(self.0.to_string())
        }
    }

    struct Slow;

    #[async_trait]
    impl LanguageModel for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, AgentError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("[]".to_string())
        }
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("x", "Louvre", "museum"),
            Candidate::new("y", "Jardin du Luxembourg", "park"),
        ]
    }

    #[test]
    fn test_prompt_contents() {
        let prefs: SlotRecord = [(SlotField::Hobbies, json!("art"))].into_iter().collect();
        let prompt = ranking_prompt(&prefs, &candidates(), None);

        assert!(prompt.contains("\"id\": \"x\""));
        assert!(prompt.contains("Louvre"));
        assert!(prompt.contains("'art'"));
        assert!(prompt.contains("'medium'"));
        assert!(prompt.contains(NO_WEATHER));
        assert!(!prompt.contains("photo_references"));
    }

    #[test]
    fn test_prompt_includes_weather() {
        let prompt = ranking_prompt(&SlotRecord::new(), &candidates(), Some("Rain all week."));
        assert!(prompt.contains("Rain all week."));
        assert!(!prompt.contains(NO_WEATHER));
    }

    #[tokio::test]
    async fn test_try_rank_parses_fenced_list() {
        let oracle = LlmRankingOracle::new(
            Arc::new(Fixed("```json\n[\"y\", \"x\"]\n```")),
            Duration::from_secs(5),
        );
        let ids = oracle
            .try_rank(&SlotRecord::new(), &candidates(), None)
            .await
            .unwrap();
        assert_eq!(ids, vec!["y".to_string(), "x".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_reply_gives_identity_order() {
        let oracle = LlmRankingOracle::new(
            Arc::new(Fixed("I recommend the Louvre first.")),
            Duration::from_secs(5),
        );
        assert!(oracle
            .try_rank(&SlotRecord::new(), &candidates(), None)
            .await
            .is_err());
        assert_eq!(
            oracle.rank(&SlotRecord::new(), &candidates(), None).await,
            vec!["x".to_string(), "y".to_string()]
        );
    }

    #[tokio::test]
    async fn test_timeout_gives_identity_order() {
        let oracle = LlmRankingOracle::new(Arc::new(Slow), Duration::from_millis(50));
        let result = oracle.try_rank(&SlotRecord::new(), &candidates(), None).await;
        assert!(matches!(result, Err(OracleError::Timeout(_))));
        assert_eq!(
            oracle.rank(&SlotRecord::new(), &candidates(), None).await,
            vec!["x".to_string(), "y".to_string()]
        );
    }
}
