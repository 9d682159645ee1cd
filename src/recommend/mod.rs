//! Recommendation pipeline: local sort, cached re-ranking, merge, truncate.
//!
//! ```text
//! candidates ──► sort_candidates ──► CacheKey::derive ──► cache hit? ──► merge_ranked ──► truncate
//!                                                           │ miss
//!                                                           ▼
//!                                                     RankingOracle::try_rank
//!                                                     (only successes cached)
//! ```

pub mod cache;
pub mod candidate;
pub mod merger;

pub use cache::{CacheKey, RecommendationCache};
pub use candidate::{sort_candidates, Candidate, Provenance, SortKey};
pub use merger::merge_ranked;

use crate::oracle::{record_fallback, RankingOracle};
use crate::slots::SlotRecord;
use std::sync::Arc;

/// Per-call knobs for [`Recommender::recommend`].
#[derive(Debug, Clone, Copy)]
pub struct RecommendOptions {
    /// Most candidates returned.
    pub number: usize,
    /// Local ordering applied before re-ranking.
    pub sort: SortKey,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            number: 20,
            sort: SortKey::Rating,
        }
    }
}

/// Re-ranks candidate lists with a ranking oracle behind a shared cache.
#[derive(Clone)]
pub struct Recommender {
    oracle: Arc<dyn RankingOracle>,
    cache: Arc<RecommendationCache>,
}

impl Recommender {
    pub fn new(oracle: Arc<dyn RankingOracle>, cache: Arc<RecommendationCache>) -> Self {
        Self { oracle, cache }
    }

    pub fn cache(&self) -> &Arc<RecommendationCache> {
        &self.cache
    }

    /// Whether re-ranking can do more than keep the input order.
    pub fn can_rerank(&self) -> bool {
        self.oracle.is_available()
    }

    /// Reorder `candidates` by oracle preference.
    ///
    /// Always returns a permutation of the input. Oracle failures keep the
    /// input order and are not cached, so a later call retries the oracle.
    pub async fn rerank(
        &self,
        candidates: Vec<Candidate>,
        preferences: &SlotRecord,
        weather: Option<&str>,
    ) -> Vec<Candidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let key = CacheKey::derive(
            preferences,
            candidates.iter().map(|c| c.id.as_str()),
            weather,
        );

        let ranked = match self.cache.get(&key) {
            Some(ids) => {
                metrics::counter!("atlas_rerank_cache_total", "result" => "hit").increment(1);
                tracing::debug!(key = %key, "Ranking cache hit");
                ids
            }
            None => {
                metrics::counter!("atlas_rerank_cache_total", "result" => "miss").increment(1);
                match self.oracle.try_rank(preferences, &candidates, weather).await {
                    Ok(ids) => {
                        tracing::debug!(key = %key, ranked = ids.len(), "Caching ranking");
                        self.cache.put(key, ids.clone());
                        ids
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            candidates = candidates.len(),
                            "Ranking failed; keeping original order"
                        );
                        record_fallback("ranking", &e);
                        return candidates;
                    }
                }
            }
        };

        merge_ranked(candidates, &ranked)
    }

    /// Full pipeline for one candidate list.
    ///
    /// Re-ranking is skipped when the preferences are empty or no ranking
    /// model is available; the local sort and truncation always apply.
    pub async fn recommend(
        &self,
        mut candidates: Vec<Candidate>,
        preferences: &SlotRecord,
        weather: Option<&str>,
        options: RecommendOptions,
    ) -> Vec<Candidate> {
        if candidates.is_empty() {
            return candidates;
        }

        sort_candidates(&mut candidates, options.sort);

        let preferences = preferences.non_empty();
        let mut ranked = if preferences.is_empty() || !self.can_rerank() {
            tracing::debug!(
                candidates = candidates.len(),
                "Skipping re-ranking; returning local order"
            );
            candidates
        } else {
            self.rerank(candidates, &preferences, weather).await
        };

        ranked.truncate(options.number);
        ranked
    }
}
