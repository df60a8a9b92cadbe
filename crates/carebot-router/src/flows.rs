//! Conversation flows — fixed prompt templates, provider bindings, and the
//! canned texts and controls the router emits.
//!
//! Each provider-backed chat state maps to exactly one [`Flow`]. The flow
//! names the provider to call, the label shown next to the answer, and the
//! control appended after it.

use carebot_core::types::ChatState;

// ─────────────────────────────────────────────
// Canned responses
// ─────────────────────────────────────────────

/// Returned for an empty message outside the menu.
pub const VALIDATION_MESSAGE: &str = "Please enter a message.";

/// Shown when a client switches into symptom collection.
pub const SYMPTOM_FIRST_PROMPT: &str =
    "Please describe your symptoms (e.g., fever, cough, headache).";

/// Returned while fewer than [`SYMPTOMS_BEFORE_TRIAGE`] symptoms are known.
pub const SYMPTOM_MORE_PROMPT: &str = "Please share another symptom or type 'done'.";

/// Returned for a chat state the router does not know.
pub const INVALID_STATE_MESSAGE: &str = "Invalid state. Please start over.";

/// Returned whenever a provider call fails, whatever the cause.
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, an error occurred. Please try again.";

/// Symptom count that triggers triage without waiting for `done`.
pub const SYMPTOMS_BEFORE_TRIAGE: usize = 3;

/// Message that ends symptom collection early (case-insensitive).
pub const DONE_KEYWORD: &str = "done";

const BUTTON_CLASS: &str = "bg-blue-500 text-white px-4 py-2 rounded hover:bg-blue-600";

/// A button that switches the widget to `state`.
pub fn option_button(state: ChatState, label: &str) -> String {
    format!(
        "<button onclick=\"handleChatbotOption('{}')\" class=\"{}\">{}</button>",
        state.as_str(),
        BUTTON_CLASS,
        label
    )
}

/// The main menu: one button per provider-backed flow.
pub fn menu() -> String {
    [
        "Please select an option:<br>".to_string(),
        option_button(ChatState::Symptom, "Check Symptoms"),
        option_button(ChatState::Doctor, "Talk to a Doctor"),
        option_button(ChatState::Patient, "Join Patient Community"),
    ]
    .join("\n")
}

// ─────────────────────────────────────────────
// Flows
// ─────────────────────────────────────────────

/// Control appended after a provider answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowUp {
    ConnectWithDoctor,
    BackToMenu,
}

impl FollowUp {
    pub fn markup(self) -> String {
        match self {
            FollowUp::ConnectWithDoctor => option_button(ChatState::Doctor, "Connect with a Doctor"),
            FollowUp::BackToMenu => option_button(ChatState::Initial, "Back to Menu"),
        }
    }
}

/// One provider-backed conversation path.
#[derive(Debug)]
pub struct Flow {
    /// Name used in logs (e.g. `"symptom-triage"`).
    pub name: &'static str,
    /// Registry name of the provider to call.
    pub provider: &'static str,
    /// Display label of the backend, returned as `model_used`.
    pub model_label: &'static str,
    pub follow_up: FollowUp,
    template: fn(&str) -> String,
}

impl Flow {
    /// Fill the template with the user's message or symptom list.
    pub fn prompt(&self, subject: &str) -> String {
        (self.template)(subject)
    }

    /// Provider reply followed by this flow's control.
    pub fn decorate(&self, reply: &str) -> String {
        format!("{}<br>{}", reply, self.follow_up.markup())
    }
}

pub static SYMPTOM_TRIAGE: Flow = Flow {
    name: "symptom-triage",
    provider: "groq",
    model_label: "Llama 3.1 (Groq)",
    follow_up: FollowUp::ConnectWithDoctor,
    template: triage_prompt,
};

pub static DOCTOR_CONSULTATION: Flow = Flow {
    name: "doctor-consultation",
    provider: "anthropic",
    model_label: "Claude 3.5 Sonnet",
    follow_up: FollowUp::BackToMenu,
    template: doctor_prompt,
};

pub static PATIENT_COMMUNITY: Flow = Flow {
    name: "patient-community",
    provider: "openai",
    model_label: "ChatGPT (GPT-4o)",
    follow_up: FollowUp::BackToMenu,
    template: patient_prompt,
};

/// The flow that ultimately answers in `state`, if any.
pub fn flow_for(state: ChatState) -> Option<&'static Flow> {
    match state {
        ChatState::Initial => None,
        ChatState::Symptom => Some(&SYMPTOM_TRIAGE),
        ChatState::Doctor => Some(&DOCTOR_CONSULTATION),
        ChatState::Patient => Some(&PATIENT_COMMUNITY),
    }
}

fn triage_prompt(symptoms: &str) -> String {
    format!(
        "You are a medical assistant analyzing symptoms for a patient in rural Kenya. \
         The patient has reported: {symptoms}. \
         Provide a concise possible diagnosis (e.g., cold, flu, malaria) and recommend consulting a doctor. \
         Avoid definitive diagnoses; emphasize professional medical advice."
    )
}

fn doctor_prompt(message: &str) -> String {
    format!(
        "You are a medical assistant simulating a doctor consultation. \
         The user has asked: \"{message}\". \
         Provide general advice, avoid definitive diagnoses, and emphasize consulting a licensed doctor. \
         Keep the response concise and professional."
    )
}

fn patient_prompt(message: &str) -> String {
    format!(
        "You are a friendly assistant in a patient community chat. \
         The user shared: \"{message}\". \
         Respond empathetically, encouraging sharing or advice from others, and keep the tone supportive."
    )
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
