//! Conversation sessions.
//!
//! Each [`Session`] owns its slot record and message history. Sessions are
//! kept in a [`SessionStore`] behind a per-session async mutex, so turns for
//! one session run one at a time while different sessions proceed in
//! parallel.

pub mod intake;

pub use intake::{templated_reply, Intake, Turn, TurnReply};

use crate::agent::ChatMessage;
use crate::logging::generate_session_id;
use crate::slots::SlotRecord;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Caller-owned conversation context.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub slots: SlotRecord,
    history: Vec<ChatMessage>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slots: SlotRecord::new(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.history.push(message);
    }
}

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// All live sessions, keyed by id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `id`, creating it when absent.
    ///
    /// A missing or blank id starts a new session under a fresh UUID.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle) {
        let id = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => generate_session_id(),
        };

        let handle = self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "Created session");
                Arc::new(Mutex::new(Session::new(id.clone())))
            })
            .clone();
        (id, handle)
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Discard a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
