//! Wire flavors — the closed set of request/response shapes providers speak.
//!
//! | flavor              | path                | auth                           | reply text                  |
//! |---------------------|---------------------|--------------------------------|-----------------------------|
//! | `ChatCompletions`   | `/chat/completions` | `Authorization: Bearer <key>`  | `choices[0].message.content`|
//! | `AnthropicMessages` | `/messages`         | `x-api-key: <key>`             | `content[0].text`           |

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use carebot_core::types::Message;

/// Value of the `anthropic-version` header required by the messages API.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// How a provider expects requests to look and how it shapes replies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiFlavor {
    /// OpenAI-compatible chat completions (OpenAI, Groq).
    ChatCompletions,
    /// Anthropic messages API.
    AnthropicMessages,
}

/// Request body shared by both flavors.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

impl ApiFlavor {
    /// Path appended to the provider's API base.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            ApiFlavor::ChatCompletions => "/chat/completions",
            ApiFlavor::AnthropicMessages => "/messages",
        }
    }

    /// Build the outbound POST, with this flavor's credential header.
    ///
    /// Exactly one credential header is set: the messages API gets
    /// `x-api-key` and never an `Authorization` header.
    pub fn build_request(
        self,
        client: &Client,
        url: &str,
        api_key: &str,
        body: &CompletionRequest<'_>,
    ) -> RequestBuilder {
        let request = client.post(url).json(body);
        match self {
            ApiFlavor::ChatCompletions => request.bearer_auth(api_key),
            ApiFlavor::AnthropicMessages => request
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
        }
    }

    /// Pull the reply text out of a raw response body.
    ///
    /// Returns `None` when the body does not have this flavor's shape or
    /// the text slot is empty/null.
    pub fn extract_reply(self, body: &str) -> Option<String> {
        match self {
            ApiFlavor::ChatCompletions => serde_json::from_str::<ChatCompletionResponse>(body)
                .ok()?
                .choices
                .into_iter()
                .next()?
                .message
                .content,
            ApiFlavor::AnthropicMessages => serde_json::from_str::<MessagesResponse>(body)
                .ok()?
                .content
                .into_iter()
                .next()?
                .text,
        }
    }
}

// ─────────────────────────────────────────────
// Response shapes (deserialization only)
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
