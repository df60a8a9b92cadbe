//! Conversation router — the chat-state machine.
//!
//! | state     | input                                  | action                         | next      |
//! |-----------|----------------------------------------|--------------------------------|-----------|
//! | `initial` | anything                               | menu, no provider call         | `initial` |
//! | `symptom` | fewer than 3 symptoms, not `done`      | collect, ask for more          | `symptom` |
//! | `symptom` | 3rd symptom or `done`                  | triage call, clear symptoms    | `initial` |
//! | `doctor`  | message                                | consultation call              | `initial` |
//! | `patient` | message                                | community call                 | `initial` |
//! | not menu  | empty message                          | validation prompt, no mutation | unchanged |
//!
//! Provider failures never escape: the caller gets a generic apology and the
//! session is reset to `initial` with no symptoms.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use carebot_core::session::{SessionStore, SessionUpdate};
use carebot_core::types::{ChatState, Message};
use carebot_providers::{ChatDispatch, DispatchError};

use crate::flows::{
    self, Flow, DOCTOR_CONSULTATION, DONE_KEYWORD, GENERIC_ERROR_MESSAGE, INVALID_STATE_MESSAGE,
    PATIENT_COMMUNITY, SYMPTOMS_BEFORE_TRIAGE, SYMPTOM_MORE_PROMPT, SYMPTOM_TRIAGE,
    VALIDATION_MESSAGE,
};

/// User id used when a request carries none.
pub const DEFAULT_USER_ID: &str = "default";

// ─────────────────────────────────────────────
// Request / reply
// ─────────────────────────────────────────────

/// One incoming chat turn. Every field is optional; `null` counts as absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: Option<String>,
    pub message: Option<String>,
    pub chat_state: Option<String>,
    pub symptoms: Option<Vec<String>>,
}

impl ChatRequest {
    /// A request carrying `message` in the given state.
    pub fn new(chat_state: ChatState, message: impl Into<String>) -> Self {
        ChatRequest {
            message: Some(message.into()),
            chat_state: Some(chat_state.as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.symptoms = Some(symptoms);
        self
    }
}

/// The router's answer, including the state the client should send next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Text to display; may embed button markup.
    pub response: String,
    pub chat_state: String,
    pub symptoms: Vec<String>,
    /// Display label of the backend that produced the answer.
    pub model_used: Option<String>,
}

impl ChatReply {
    fn new(response: impl Into<String>, chat_state: ChatState, symptoms: Vec<String>) -> Self {
        ChatReply {
            response: response.into(),
            chat_state: chat_state.as_str().to_string(),
            symptoms,
            model_used: None,
        }
    }

    fn generic_error() -> Self {
        ChatReply::new(GENERIC_ERROR_MESSAGE, ChatState::Initial, Vec::new())
    }
}

// ─────────────────────────────────────────────
// ConversationRouter
// ─────────────────────────────────────────────

/// Routes chat turns through the state machine, calling providers through
/// the injected dispatcher and recording progress in the session store.
pub struct ConversationRouter {
    sessions: Arc<dyn SessionStore>,
    dispatch: Arc<dyn ChatDispatch>,
}

impl ConversationRouter {
    pub fn new(sessions: Arc<dyn SessionStore>, dispatch: Arc<dyn ChatDispatch>) -> Self {
        Self { sessions, dispatch }
    }

    /// The session store this router writes to.
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Process one chat turn.
    pub async fn handle(&self, request: ChatRequest) -> ChatReply {
        let user_id = request
            .user_id
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
        let message = request.message.unwrap_or_default().trim().to_string();
        let requested = request
            .chat_state
            .unwrap_or_else(|| ChatState::Initial.as_str().to_string());
        let symptoms = request.symptoms.unwrap_or_default();

        if message.is_empty() && requested != ChatState::Initial.as_str() {
            debug!(user_id = %user_id, state = %requested, "empty message rejected");
            return ChatReply {
                response: VALIDATION_MESSAGE.to_string(),
                chat_state: requested,
                symptoms,
                model_used: None,
            };
        }

        // Earlier turns only: the prompt itself carries this turn's message.
        let history = self.sessions.get_or_create(&user_id).history;
        if !message.is_empty() {
            self.sessions.append_message(&user_id, Message::user(&message));
        }

        let state = match requested.parse::<ChatState>() {
            Ok(state) => state,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "rejecting request");
                self.reset(&user_id);
                return ChatReply::new(INVALID_STATE_MESSAGE, ChatState::Initial, Vec::new());
            }
        };

        info!(user_id = %user_id, state = %state, history = history.len(), "routing chat turn");

        match state {
            ChatState::Initial => {
                self.sessions.update(
                    &user_id,
                    SessionUpdate::default()
                        .chat_state(ChatState::Initial)
                        .symptoms(symptoms.clone()),
                );
                ChatReply::new(flows::menu(), ChatState::Initial, symptoms)
            }
            ChatState::Symptom => self.collect_symptom(&user_id, &message, symptoms, &history).await,
            ChatState::Doctor => {
                self.run_flow(&user_id, &DOCTOR_CONSULTATION, &message, &history, symptoms)
                    .await
            }
            ChatState::Patient => {
                self.run_flow(&user_id, &PATIENT_COMMUNITY, &message, &history, symptoms)
                    .await
            }
        }
    }

    /// Add one symptom, or run triage once enough are known or the user
    /// says `done`, even with nothing collected.
    async fn collect_symptom(
        &self,
        user_id: &str,
        message: &str,
        mut symptoms: Vec<String>,
        history: &[Message],
    ) -> ChatReply {
        let done = message.eq_ignore_ascii_case(DONE_KEYWORD);
        if !done {
            symptoms.push(message.to_lowercase());
        }

        if !done && symptoms.len() < SYMPTOMS_BEFORE_TRIAGE {
            self.sessions.update(
                user_id,
                SessionUpdate::default()
                    .chat_state(ChatState::Symptom)
                    .symptoms(symptoms.clone()),
            );
            return ChatReply::new(SYMPTOM_MORE_PROMPT, ChatState::Symptom, symptoms);
        }

        let subject = symptoms.join(", ");
        self.run_flow(user_id, &SYMPTOM_TRIAGE, &subject, history, Vec::new())
            .await
    }

    /// Call the flow's provider and settle the session.
    ///
    /// On success the session returns to `initial` holding `symptoms_after`
    /// and the raw reply is recorded as an assistant message.
    async fn run_flow(
        &self,
        user_id: &str,
        flow: &Flow,
        subject: &str,
        history: &[Message],
        symptoms_after: Vec<String>,
    ) -> ChatReply {
        let prompt = flow.prompt(subject);

        match self.dispatch.call(flow.provider, &prompt, history).await {
            Ok(reply) => {
                debug!(user_id, flow = flow.name, "provider replied");
                self.sessions
                    .append_message(user_id, Message::assistant(reply.as_str()));
                self.sessions.update(
                    user_id,
                    SessionUpdate::default()
                        .chat_state(ChatState::Initial)
                        .symptoms(symptoms_after.clone()),
                );
                ChatReply {
                    model_used: Some(flow.model_label.to_string()),
                    ..ChatReply::new(flow.decorate(&reply), ChatState::Initial, symptoms_after)
                }
            }
            Err(err) => {
                self.log_failure(user_id, flow, &err);
                self.reset(user_id);
                ChatReply::generic_error()
            }
        }
    }

    fn log_failure(&self, user_id: &str, flow: &Flow, err: &DispatchError) {
        warn!(
            user_id,
            flow = flow.name,
            provider = flow.provider,
            kind = err.kind().as_str(),
            error = %err,
            "provider call failed"
        );
    }

    /// Back to the menu with nothing collected.
    fn reset(&self, user_id: &str) {
        self.sessions.update(
            user_id,
            SessionUpdate::default()
                .chat_state(ChatState::Initial)
                .symptoms(Vec::new()),
        );
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
