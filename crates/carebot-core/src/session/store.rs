//! In-memory session store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;

use crate::types::{ChatState, Message, Session};

// ─────────────────────────────────────────────
// SessionStore trait
// ─────────────────────────────────────────────

/// Attributes to overwrite on a session. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct SessionUpdate {
    pub history: Option<Vec<Message>>,
    pub chat_state: Option<ChatState>,
    pub symptoms: Option<Vec<String>>,
}

impl SessionUpdate {
    /// Overwrite the chat state.
    pub fn chat_state(mut self, state: ChatState) -> Self {
        self.chat_state = Some(state);
        self
    }

    /// Overwrite the symptom list.
    pub fn symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.symptoms = Some(symptoms);
        self
    }

    /// Overwrite the whole history.
    pub fn history(mut self, history: Vec<Message>) -> Self {
        self.history = Some(history);
        self
    }
}

/// Keyed store of conversation sessions.
///
/// Every operation is total: any string is a valid user id and a missing
/// entry is created on demand.
pub trait SessionStore: Send + Sync {
    /// Return a snapshot of the session, creating an empty one if absent.
    fn get_or_create(&self, user_id: &str) -> Session;

    /// Overwrite the attributes named in `update`.
    fn update(&self, user_id: &str, update: SessionUpdate);

    /// Append one message to the session history.
    fn append_message(&self, user_id: &str, message: Message);

    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────
// InMemorySessionStore
// ─────────────────────────────────────────────

/// Process-local session store backed by a `RwLock<HashMap>`.
///
/// The lock makes single operations atomic; a read-modify-write sequence
/// across calls is last-write-wins.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the map itself intact, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, user_id: &str) -> Session {
        if let Some(session) = self.read().get(user_id) {
            return session.clone();
        }

        let mut sessions = self.write();
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(user_id, "created session");
                Session::new(user_id)
            })
            .clone()
    }

    fn update(&self, user_id: &str, update: SessionUpdate) {
        let mut sessions = self.write();
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Session::new(user_id));

        if let Some(history) = update.history {
            session.history = history;
        }
        if let Some(state) = update.chat_state {
            session.chat_state = state;
        }
        if let Some(symptoms) = update.symptoms {
            session.symptoms = symptoms;
        }
        session.updated_at = Utc::now();
    }

    fn append_message(&self, user_id: &str, message: Message) {
        let mut sessions = self.write();
        let session = sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Session::new(user_id));
        session.history.push(message);
        session.updated_at = Utc::now();
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
