//! One conversational intake turn.

use super::Session;
use crate::agent::{AgentError, ChatMessage, CompletionRequest, LanguageModel};
use crate::logging::{field_list, message_preview};
use crate::oracle::ExtractionOracle;
use crate::slots::{evaluate, CompletionStatus, SlotField, SlotRecord, START_DATE_UNDECIDED};
use futures_util::stream::{self, BoxStream};
use std::sync::Arc;
use std::time::Duration;

const ASSISTANT_PROMPT: &str = "You are a helpful travel assistant. Your job is to collect \
information about the user's travel plans. Be friendly, conversational, and help the user plan \
their trip. Collect all necessary information. Also pay attention to any specific requirements \
the traveler mentions, such as accessibility needs, food restrictions, special interests, or any \
constraints that might affect their trip.";

/// Result of merging one user message into a session.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Slot record after the merge.
    pub state: SlotRecord,
    pub status: CompletionStatus,
    /// Fields written by this turn's extraction.
    pub updated: Vec<SlotField>,
    request: CompletionRequest,
}

impl Turn {
    /// `"recommend"` once enough is known, else `"collect"`.
    pub fn next_step(&self) -> &'static str {
        if self.status.ready {
            "recommend"
        } else {
            "collect"
        }
    }
}

/// A finished non-streaming turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub turn: Turn,
    pub reply: String,
}

/// Runs intake turns: extraction, slot merge, completion check and reply.
#[derive(Clone)]
pub struct Intake {
    extraction: Arc<dyn ExtractionOracle>,
    chat: Option<Arc<dyn LanguageModel>>,
    chat_model: Option<String>,
    chat_temperature: f32,
    timeout: Duration,
    log_conversation: bool,
}

impl Intake {
    pub fn new(extraction: Arc<dyn ExtractionOracle>) -> Self {
        Self {
            extraction,
            chat: None,
            chat_model: None,
            chat_temperature: 0.7,
            timeout: Duration::from_secs(60),
            log_conversation: false,
        }
    }

    /// Language model for replies; `model` overrides the agent default.
    pub fn with_chat(
        mut self,
        chat: Arc<dyn LanguageModel>,
        model: Option<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        self.chat = Some(chat);
        self.chat_model = model;
        self.chat_temperature = temperature;
        self.timeout = timeout;
        self
    }

    pub fn with_conversation_logging(mut self, enabled: bool) -> Self {
        self.log_conversation = enabled;
        self
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }

    /// Merge `text` into the session and prepare the reply request.
    ///
    /// Blank text changes nothing and only re-evaluates the current state.
    pub async fn begin(&self, session: &mut Session, text: &str) -> Turn {
        if session.history().is_empty() {
            session.push(ChatMessage::system(ASSISTANT_PROMPT));
        }

        let mut updated = Vec::new();
        if !text.trim().is_empty() {
            let extracted = self.extraction.extract(text).await;
            updated = session.slots.merge(&extracted);
            session.push(ChatMessage::user(text));
        }

        let status = evaluate(&session.slots);
        tracing::info!(
            session_id = %session.id,
            updated = %field_list(&updated),
            missing = %field_list(&status.missing_required),
            core_complete = status.core_complete,
            ready = status.ready,
            "Intake turn"
        );
        if let Some(preview) = message_preview(text, self.log_conversation) {
            tracing::debug!(session_id = %session.id, message = %preview, "User message");
        }

        let mut messages = session.history().to_vec();
        messages.push(ChatMessage::system(state_prompt(&session.slots, &status)));
        let mut request = CompletionRequest::new(messages).with_model(self.chat_model.clone());
        request.temperature = Some(self.chat_temperature);

        Turn {
            state: session.slots.clone(),
            status,
            updated,
            request,
        }
    }

    /// Record the assistant's reply in the session history.
    pub fn finish(&self, session: &mut Session, reply: &str) {
        if reply.trim().is_empty() {
            return;
        }
        if let Some(preview) = message_preview(reply, self.log_conversation) {
            tracing::debug!(session_id = %session.id, reply = %preview, "Assistant reply");
        }
        session.push(ChatMessage::assistant(reply));
    }

    /// Run a whole turn and wait for the reply.
    ///
    /// Without a chat model, or when it fails, the reply is a fixed
    /// template listing what is still needed.
    pub async fn reply(&self, session: &mut Session, text: &str) -> TurnReply {
        let turn = self.begin(session, text).await;

        let reply = match &self.chat {
            None => templated_reply(&turn.status),
            Some(chat) => {
                match tokio::time::timeout(self.timeout, chat.complete(turn.request.clone())).await
                {
                    Ok(Ok(reply)) => reply,
                    Ok(Err(e)) => {
                        tracing::warn!(session_id = %session.id, error = %e, "Chat reply failed; using template");
                        templated_reply(&turn.status)
                    }
                    Err(_) => {
                        tracing::warn!(
                            session_id = %session.id,
                            timeout_ms = self.timeout.as_millis() as u64,
                            "Chat reply timed out; using template"
                        );
                        templated_reply(&turn.status)
                    }
                }
            }
        };

        self.finish(session, &reply);
        TurnReply { turn, reply }
    }

    /// Reply deltas for a prepared turn.
    pub async fn stream(
        &self,
        turn: &Turn,
    ) -> Result<BoxStream<'static, Result<String, AgentError>>, AgentError> {
        let Some(chat) = &self.chat else {
            let text = templated_reply(&turn.status);
            return Ok(Box::pin(stream::once(async move { Ok(text) })));
        };

        match tokio::time::timeout(self.timeout, chat.complete_stream(turn.request.clone())).await {
            Ok(result) => result,
            Err(_) => Err(AgentError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

fn state_prompt(slots: &SlotRecord, status: &CompletionStatus) -> String {
    let required: Vec<&str> = SlotField::REQUIRED.iter().map(|f| f.as_str()).collect();
    let missing: Vec<&str> = status.missing_required.iter().map(|f| f.as_str()).collect();

    format!(
        "Current state: {state}\n\
         Required fields: {required}\n\
         Missing fields: {missing}\n\
         Core travel info complete: {core}\n\
         Ready to proceed: {ready}\n\n\
         Please help the user complete the missing information in a natural way.\n\
         Remember to acknowledge information that has already been provided.\n\
         Tell the user that they can write \"{undecided}\" for the start date if they don't have a specific date in mind.\n\
         Also pay attention to any specific requirements they mention and reflect these in your responses.\n\n\
         If the user has provided the core travel information (city, days, budget, people), \
         you can proceed even if some optional details are missing.",
        state = slots.to_json(),
        required = serde_json::json!(required),
        missing = serde_json::json!(missing),
        core = status.core_complete,
        ready = status.ready,
        undecided = START_DATE_UNDECIDED,
    )
}

/// Reply used when no chat model is available.
///
/// # Examples
///
/// ```
/// use atlas::session::templated_reply;
/// use atlas::slots::{evaluate, SlotRecord};
///
/// let reply = templated_reply(&evaluate(&SlotRecord::new()));
/// assert!(reply.contains("city, days, budget"));
/// ```
pub fn templated_reply(status: &CompletionStatus) -> String {
    if status.ready {
        return "Great, I have enough to start planning your trip. \
                Let's look at some attractions."
            .to_string();
    }

    let mut reply = format!(
        "Thanks! To plan your trip I still need: {}.",
        status
            .missing_required
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !status.start_date_settled {
        reply.push_str(&format!(
            " If you don't have a start date in mind yet, just write \"{}\".",
            START_DATE_UNDECIDED
        ));
    }
    reply
}
