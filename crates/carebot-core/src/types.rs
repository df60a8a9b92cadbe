//! Core types for Carebot — message records, chat states, sessions.
//!
//! `Message` serializes to the `{"role": ..., "content": ...}` shape that both
//! the chat-completions and the messages APIs accept, so history can be
//! forwarded to a provider without conversion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Who authored a message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single role-tagged entry of a conversation history.
///
/// Immutable once appended to a session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Chat state
// ─────────────────────────────────────────────

/// The conversation flow a session is currently in.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatState {
    /// Main menu, no provider involved.
    #[default]
    Initial,
    /// Collecting symptoms before a triage call.
    Symptom,
    /// One-shot doctor consultation.
    Doctor,
    /// One-shot patient community reply.
    Patient,
}

impl ChatState {
    /// All states, in menu order.
    pub const ALL: [ChatState; 4] = [
        ChatState::Initial,
        ChatState::Symptom,
        ChatState::Doctor,
        ChatState::Patient,
    ];

    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatState::Initial => "initial",
            ChatState::Symptom => "symptom",
            ChatState::Doctor => "doctor",
            ChatState::Patient => "patient",
        }
    }
}

impl fmt::Display for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a chat state string is not one of the known states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown chat state '{0}'")]
pub struct UnknownChatState(pub String);

impl FromStr for ChatState {
    type Err = UnknownChatState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownChatState(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────

/// Per-user conversation state, held only in process memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    /// Append-only within the life of the session.
    pub history: Vec<Message>,
    pub chat_state: ChatState,
    /// Symptoms collected so far; cleared once triage completes.
    pub symptoms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session in the `initial` state.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Session {
            user_id: user_id.into(),
            history: Vec::new(),
            chat_state: ChatState::Initial,
            symptoms: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
