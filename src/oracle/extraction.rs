//! Slot extraction backed by a language model.

use super::parse::parse_object;
use super::{ExtractionOracle, OracleError};
use crate::agent::{ChatMessage, CompletionRequest, LanguageModel};
use crate::slots::{SlotField, SlotRecord, START_DATE_UNDECIDED};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Asks the model to fill the trip-request fields from one user message.
pub struct LlmExtractionOracle {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl LlmExtractionOracle {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }
}

/// System prompt listing every field with an empty placeholder.
pub fn extraction_prompt() -> String {
    let skeleton = SlotField::ALL
        .iter()
        .map(|field| format!("  \"{}\": \"\"", field))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Extract the following travel information from the user's message and return JSON.
Carefully analyze the message to understand both explicit and implicit information.

For example, if the user says "without kids" or "no children", set "kids" to "no".
If they mention "all adults", also set "kids" to "no".
If they mention family with children, set "kids" to "yes".
The people field should be an integer.
If the user gives a start date, set "start_date" to a YYYY-MM-DD string. If they say they have no date in mind, set "start_date" to "{undecided}".
Pay attention to negations and context. Understand the meaning instead of matching keywords.

Also extract any specific requirements, constraints or special requests the user mentions, including:
- Accessibility needs (e.g., wheelchair access, limited mobility)
- Food restrictions or dietary preferences
- Special interests or experiences they want to have
- Particular constraints (e.g., fear of heights, need quiet accommodations)
- Any important preferences not covered by other fields

Return the following JSON structure:
{{
{skeleton}
}}

If any information is missing or unclear, leave that field as an empty string.
Put specific requirements and constraints in specificRequirements.
Only return the JSON object."#,
        undecided = START_DATE_UNDECIDED,
        skeleton = skeleton,
    )
}

#[async_trait]
impl ExtractionOracle for LlmExtractionOracle {
    async fn try_extract(&self, text: &str) -> Result<SlotRecord, OracleError> {
        if text.trim().is_empty() {
            return Ok(SlotRecord::new());
        }

        let request = CompletionRequest::new(vec![
            ChatMessage::system(extraction_prompt()),
            ChatMessage::user(text),
        ]);

        let reply = tokio::time::timeout(self.timeout, self.model.complete(request))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout.as_secs()))??;

        let extracted = SlotRecord::from(parse_object(&reply)?).non_empty();
        tracing::debug!(
            model = %self.model.name(),
            fields = extracted.len(),
            "Extracted slots"
        );
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replies with a fixed string and records the prompts it saw.
    struct Scripted {
        reply: Result<String, ()>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, AgentError> {
            self.seen.lock().unwrap().push(request);
            self.reply
                .clone()
                .map_err(|_| AgentError::Network("unreachable".to_string()))
        }
    }

    #[test]
    fn test_prompt_lists_every_field() {
        let prompt = extraction_prompt();
        for field in SlotField::ALL {
            assert!(prompt.contains(&format!("\"{}\": \"\"", field)), "{}", field);
        }
        assert!(prompt.contains(START_DATE_UNDECIDED));
    }

    #[tokio::test]
    async fn test_extracts_known_non_empty_fields() {
        let model = Scripted::ok(
            "```json\n{\"city\": \"Paris\", \"days\": 5, \"kids\": \"\", \"hotel\": \"Ritz\"}\n```",
        );
        let oracle = LlmExtractionOracle::new(model.clone(), Duration::from_secs(5));

        let record = oracle.try_extract("Paris for 5 days").await.unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(SlotField::City), Some(&json!("Paris")));
        assert_eq!(record.get(SlotField::Days), Some(&json!(5)));

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].messages[1].content, "Paris for 5 days");
    }

    #[tokio::test]
    async fn test_non_object_reply_is_malformed() {
        let oracle = LlmExtractionOracle::new(Scripted::ok("[\"Paris\"]"), Duration::from_secs(5));
        let result = oracle.try_extract("Paris").await;
        assert!(matches!(result, Err(OracleError::Malformed(_))));
        assert!(oracle.extract("Paris").await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_empty() {
        let model = Arc::new(Scripted {
            reply: Err(()),
            seen: Mutex::new(Vec::new()),
        });
        let oracle = LlmExtractionOracle::new(model, Duration::from_secs(5));
        assert!(matches!(
            oracle.try_extract("Paris").await,
            Err(OracleError::Model(_))
        ));
        assert!(oracle.extract("Paris").await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_skips_model() {
        let model = Scripted::ok("{}");
        let oracle = LlmExtractionOracle::new(model.clone(), Duration::from_secs(5));
        assert!(oracle.try_extract("   ").await.unwrap().is_empty());
        assert!(model.seen.lock().unwrap().is_empty());
    }
}
