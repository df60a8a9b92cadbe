//! Interactive console — the terminal counterpart of the chat widget.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//! Like the widget, the console carries `chat_state` and `symptoms` from
//! each reply into the next request.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use carebot_core::types::ChatState;
use carebot_core::utils::get_history_path;
use carebot_router::flows::SYMPTOM_FIRST_PROMPT;
use carebot_router::{ChatReply, ChatRequest, ConversationRouter};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// One line of console input, interpreted.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Exit,
    /// `/menu`, `/symptom`, `/doctor`, `/patient`
    Switch(ChatState),
    Message(String),
}

/// What the console sends with its next request.
#[derive(Debug)]
struct Conversation {
    user_id: String,
    chat_state: String,
    symptoms: Vec<String>,
}

impl Conversation {
    fn new(user_id: &str, chat_state: ChatState) -> Self {
        Self {
            user_id: user_id.to_string(),
            chat_state: chat_state.as_str().to_string(),
            symptoms: Vec::new(),
        }
    }

    fn request(&self, message: &str) -> ChatRequest {
        ChatRequest {
            user_id: Some(self.user_id.clone()),
            message: Some(message.to_string()),
            chat_state: Some(self.chat_state.clone()),
            symptoms: Some(self.symptoms.clone()),
        }
    }

    /// Carry the reply's state into the next turn.
    fn apply(&mut self, reply: &ChatReply) {
        self.chat_state = reply.chat_state.clone();
        self.symptoms = reply.symptoms.clone();
    }
}

/// Run the interactive console loop.
pub async fn run(router: ConversationRouter, user_id: &str, start: ChatState) -> Result<()> {
    helpers::print_banner("Chat");
    println!("  Commands: /menu /symptom /doctor /patient, \"exit\" to quit.");

    let mut editor = create_editor()?;
    let mut conversation = Conversation::new(user_id, ChatState::Initial);
    switch_to(&router, &mut conversation, start).await;

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&input);

        match parse_input(trimmed) {
            Input::Exit => {
                println!("\nGoodbye! 👋");
                break;
            }
            Input::Switch(state) => switch_to(&router, &mut conversation, state).await,
            Input::Message(message) => {
                debug!(user_id, state = %conversation.chat_state, "sending console message");
                send(&router, &mut conversation, &message).await;
            }
        }
    }

    save_history(&mut editor);
    Ok(())
}

/// Move to `state` the way a widget button does.
async fn switch_to(router: &ConversationRouter, conversation: &mut Conversation, state: ChatState) {
    conversation.chat_state = state.as_str().to_string();
    match state {
        ChatState::Initial => send(router, conversation, "").await,
        other => helpers::print_response(flow_hint(other), None),
    }
}

async fn send(router: &ConversationRouter, conversation: &mut Conversation, message: &str) {
    helpers::print_thinking();
    let reply = router.handle(conversation.request(message)).await;
    helpers::clear_thinking();
    helpers::print_response(&reply.response, reply.model_used.as_deref());
    conversation.apply(&reply);
}

/// Prompt shown after switching into a flow.
fn flow_hint(state: ChatState) -> &'static str {
    match state {
        ChatState::Initial => "",
        ChatState::Symptom => SYMPTOM_FIRST_PROMPT,
        ChatState::Doctor => "Ask your question and a doctor assistant will answer.",
        ChatState::Patient => "Share what's on your mind with the patient community.",
    }
}

fn parse_input(input: &str) -> Input {
    let lower = input.to_lowercase();
    if EXIT_COMMANDS.contains(&lower.as_str()) {
        return Input::Exit;
    }
    match lower.as_str() {
        "/menu" => Input::Switch(ChatState::Initial),
        "/symptom" => Input::Switch(ChatState::Symptom),
        "/doctor" => Input::Switch(ChatState::Doctor),
        "/patient" => Input::Switch(ChatState::Patient),
        _ => Input::Message(input.to_string()),
    }
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded console history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

fn history_path() -> std::path::PathBuf {
    get_history_path().join("cli_history")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands() {
        assert_eq!(parse_input("exit"), Input::Exit);
        assert_eq!(parse_input("EXIT"), Input::Exit);
        assert_eq!(parse_input("/quit"), Input::Exit);
        assert_eq!(parse_input(":q"), Input::Exit);
    }

    #[test]
    fn switch_commands() {
        assert_eq!(parse_input("/menu"), Input::Switch(ChatState::Initial));
        assert_eq!(parse_input("/Symptom"), Input::Switch(ChatState::Symptom));
        assert_eq!(parse_input("/doctor"), Input::Switch(ChatState::Doctor));
        assert_eq!(parse_input("/patient"), Input::Switch(ChatState::Patient));
    }

    #[test]
    fn messages_keep_their_case() {
        assert_eq!(parse_input("Fever"), Input::Message("Fever".into()));
        assert_eq!(parse_input("/unknown"), Input::Message("/unknown".into()));
    }

    #[test]
    fn conversation_carries_reply_state() {
        let mut conversation = Conversation::new("console", ChatState::Symptom);
        conversation.apply(&ChatReply {
            response: "more?".into(),
            chat_state: "symptom".into(),
            symptoms: vec!["fever".into()],
            model_used: None,
        });

        let request = conversation.request("cough");
        assert_eq!(request.user_id.as_deref(), Some("console"));
        assert_eq!(request.chat_state.as_deref(), Some("symptom"));
        assert_eq!(request.symptoms, Some(vec!["fever".to_string()]));
        assert_eq!(request.message.as_deref(), Some("cough"));
    }

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".carebot"));
        assert!(path.ends_with("history/cli_history"));
    }
}
