//! HTTP provider clients and the name → provider dispatch table.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error};

use carebot_core::config::ProvidersConfig;
use carebot_core::types::Message;
use carebot_core::utils::truncate_string;

use crate::error::DispatchError;
use crate::flavor::CompletionRequest;
use crate::registry::{configured_providers, find_by_name, ProviderConfig, ProviderSpec};
use crate::traits::{ChatDispatch, MAX_OUTPUT_TOKENS};

/// Transport deadline for one provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest error body kept in a [`DispatchError::Status`].
const MAX_ERROR_BODY: usize = 500;

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// One configured LLM backend.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Full endpoint URL (e.g. `"https://api.openai.com/v1/chat/completions"`).
    endpoint: String,
    api_key: String,
    model: String,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from its config and static spec.
    ///
    /// Config values win over the spec defaults for base URL and model.
    pub fn new(client: reqwest::Client, config: &ProviderConfig, spec: &'static ProviderSpec) -> Self {
        let api_base = config.api_base.as_deref().unwrap_or(spec.default_api_base);
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| spec.default_model.to_string());

        HttpProvider {
            client,
            endpoint: spec.endpoint_url(api_base),
            api_key: config.api_key.clone(),
            model,
            spec,
        }
    }

    pub fn spec(&self) -> &'static ProviderSpec {
        self.spec
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `history` plus a user message holding `prompt`, return the reply text.
    pub async fn complete(&self, prompt: &str, history: &[Message]) -> Result<String, DispatchError> {
        let provider = self.spec.display_name;

        let mut messages = history.to_vec();
        messages.push(Message::user(prompt));

        debug!(
            provider,
            model = %self.model,
            messages = messages.len(),
            "Calling LLM"
        );

        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let response = self
            .spec
            .flavor
            .build_request(&self.client, &self.endpoint, &self.api_key, &body)
            .send()
            .await
            .map_err(|source| {
                error!(provider, error = %source, "HTTP request failed");
                DispatchError::Transport { provider, source }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| DispatchError::Transport { provider, source })?;

        if !status.is_success() {
            let body = truncate_string(&text, MAX_ERROR_BODY);
            error!(provider, status = %status, body = %body, "API error");
            return Err(DispatchError::Status {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        match self.spec.flavor.extract_reply(&text) {
            Some(reply) => {
                debug!(provider, chars = reply.len(), "LLM response received");
                Ok(reply)
            }
            None => {
                error!(
                    provider,
                    body = %truncate_string(&text, MAX_ERROR_BODY),
                    "LLM response has no reply text"
                );
                Err(DispatchError::MalformedReply { provider })
            }
        }
    }
}

// ─────────────────────────────────────────────
// ProviderDispatcher
// ─────────────────────────────────────────────

/// Routes calls by provider name to the configured [`HttpProvider`]s.
///
/// Built once from the loaded config; providers without a key are left out
/// and calls to them fail with a configuration error.
#[derive(Debug)]
pub struct ProviderDispatcher {
    providers: HashMap<&'static str, HttpProvider>,
}

impl ProviderDispatcher {
    /// Build a dispatcher with a fresh HTTP client.
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(client, config))
    }

    /// Build a dispatcher sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: &ProvidersConfig) -> Self {
        let map = config.to_map();
        let providers = configured_providers(&map)
            .into_iter()
            .map(|(spec, provider_config)| {
                debug!(
                    provider = spec.display_name,
                    api_base = provider_config.api_base.as_deref().unwrap_or("default"),
                    "Registering LLM provider"
                );
                (spec.name, HttpProvider::new(client.clone(), provider_config, spec))
            })
            .collect();

        ProviderDispatcher { providers }
    }

    /// Whether `name` has a credential and can be called.
    pub fn is_configured(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// The configured provider for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&HttpProvider> {
        self.providers.get(name)
    }
}

#[async_trait]
impl ChatDispatch for ProviderDispatcher {
    async fn call(
        &self,
        provider: &str,
        prompt: &str,
        history: &[Message],
    ) -> Result<String, DispatchError> {
        let spec =
            find_by_name(provider).ok_or_else(|| DispatchError::UnknownProvider(provider.to_string()))?;

        let http = self
            .providers
            .get(spec.name)
            .ok_or(DispatchError::MissingCredential {
                provider: spec.name,
                env_key: spec.env_key,
            })?;

        http.complete(prompt, history).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
