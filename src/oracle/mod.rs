//! Language-model oracles for slot extraction and attraction ranking.
//!
//! Both oracles are best-effort: the `try_*` methods report why a call
//! failed, and the plain methods apply the fallback every caller wants (an
//! empty extraction, or the candidates' original order). Neither ever fails
//! a user-facing request.

use crate::agent::AgentError;
use crate::recommend::Candidate;
use crate::slots::SlotRecord;
use async_trait::async_trait;
use thiserror::Error;

pub mod extraction;
pub mod parse;
pub mod ranking;

pub use extraction::LlmExtractionOracle;
pub use ranking::LlmRankingOracle;

/// Why an oracle call produced no usable answer.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Language model call failed: {0}")]
    Model(#[from] AgentError),

    #[error("Oracle timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed oracle output: {0}")]
    Malformed(String),

    #[error("No language model configured")]
    Unavailable,
}

impl OracleError {
    /// Short label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            OracleError::Model(_) => "model",
            OracleError::Timeout(_) => "timeout",
            OracleError::Malformed(_) => "malformed",
            OracleError::Unavailable => "unavailable",
        }
    }
}

pub(crate) fn record_fallback(oracle: &'static str, err: &OracleError) {
    metrics::counter!(
        "atlas_oracle_fallback_total",
        "oracle" => oracle,
        "reason" => err.kind()
    )
    .increment(1);
}

/// Turns free text into a partial trip request.
#[async_trait]
pub trait ExtractionOracle: Send + Sync + 'static {
    async fn try_extract(&self, text: &str) -> Result<SlotRecord, OracleError>;

    /// Extraction with failures mapped to an empty record.
    async fn extract(&self, text: &str) -> SlotRecord {
        match self.try_extract(text).await {
            Ok(record) => record,
            Err(OracleError::Unavailable) => SlotRecord::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Slot extraction failed; keeping current state");
                record_fallback("extraction", &e);
                SlotRecord::new()
            }
        }
    }
}

/// Orders candidates by fit with the traveller's preferences.
#[async_trait]
pub trait RankingOracle: Send + Sync + 'static {
    /// Candidate ids from most to least recommended, as the model answered.
    ///
    /// The list may be partial, contain unknown ids or repeat ids; the
    /// merger reconciles it with the candidates.
    async fn try_rank(
        &self,
        preferences: &SlotRecord,
        candidates: &[Candidate],
        weather: Option<&str>,
    ) -> Result<Vec<String>, OracleError>;

    /// Ranking with failures mapped to the candidates' original order.
    async fn rank(
        &self,
        preferences: &SlotRecord,
        candidates: &[Candidate],
        weather: Option<&str>,
    ) -> Vec<String> {
        match self.try_rank(preferences, candidates, weather).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    candidates = candidates.len(),
                    "Ranking failed; keeping original order"
                );
                record_fallback("ranking", &e);
                candidates.iter().map(|c| c.id.clone()).collect()
            }
        }
    }

    /// Whether calls can produce anything beyond the fallback.
    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in for both oracles when no language model is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledOracle;

#[async_trait]
impl ExtractionOracle for DisabledOracle {
    async fn try_extract(&self, _text: &str) -> Result<SlotRecord, OracleError> {
        Err(OracleError::Unavailable)
    }
}

#[async_trait]
impl RankingOracle for DisabledOracle {
    async fn try_rank(
        &self,
        _preferences: &SlotRecord,
        _candidates: &[Candidate],
        _weather: Option<&str>,
    ) -> Result<Vec<String>, OracleError> {
        Err(OracleError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl RankingOracle for Failing {
        async fn try_rank(
            &self,
            _preferences: &SlotRecord,
            _candidates: &[Candidate],
            _weather: Option<&str>,
        ) -> Result<Vec<String>, OracleError> {
            Err(OracleError::Malformed("not json".to_string()))
        }
    }

    #[async_trait]
    impl ExtractionOracle for Failing {
        async fn try_extract(&self, _text: &str) -> Result<SlotRecord, OracleError> {
            Err(OracleError::Timeout(60))
        }
    }

    #[tokio::test]
    async fn test_rank_falls_back_to_identity() {
        let candidates = vec![
            Candidate::new("a", "A", "museum"),
            Candidate::new("b", "B", "park"),
        ];
        let ids = Failing.rank(&SlotRecord::new(), &candidates, None).await;
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_falls_back_to_empty() {
        assert!(Failing.extract("Paris for 5 days").await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_oracle() {
        assert!(!RankingOracle::is_available(&DisabledOracle));
        assert!(DisabledOracle.extract("anything").await.is_empty());
        let candidates = vec![Candidate::new("only", "Only", "zoo")];
        assert_eq!(
            DisabledOracle.rank(&SlotRecord::new(), &candidates, None).await,
            vec!["only".to_string()]
        );
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(OracleError::Timeout(5).kind(), "timeout");
        assert_eq!(
            OracleError::from(AgentError::Network("down".into())).kind(),
            "model"
        );
    }
}
