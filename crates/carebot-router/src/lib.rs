//! Carebot Router — the conversation state machine.
//!
//! This crate contains:
//! - **flows**: prompt templates, provider bindings, menu and button markup
//! - **router**: the `initial` / `symptom` / `doctor` / `patient` transitions

pub mod flows;
pub mod router;

pub use flows::{flow_for, Flow, FollowUp};
pub use router::{ChatReply, ChatRequest, ConversationRouter, DEFAULT_USER_ID};
