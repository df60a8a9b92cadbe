//! Provider registry — static specs for the supported LLM providers.
//!
//! Each `ProviderSpec` describes how to reach one backend: where it lives,
//! which model it runs by default, and which wire flavor it speaks. The
//! flavor decides the auth header and the reply shape, so call sites never
//! branch on the provider name.

use std::collections::HashMap;

use crate::flavor::ApiFlavor;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name (e.g. `"groq"`).
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"Groq"`.
    pub display_name: &'static str,
    /// Environment variable holding the API key. E.g. `"GROQ_API_KEY"`.
    pub env_key: &'static str,
    /// API base URL used when the config does not override it.
    pub default_api_base: &'static str,
    /// Model used when the config does not override it.
    pub default_model: &'static str,
    /// Request/response shape and auth style.
    pub flavor: ApiFlavor,
}

impl ProviderSpec {
    /// Full endpoint URL for an API base (trailing slashes ignored).
    pub fn endpoint_url(&self, api_base: &str) -> String {
        format!(
            "{}{}",
            api_base.trim_end_matches('/'),
            self.flavor.endpoint_path()
        )
    }
}

// ─────────────────────────────────────────────
// Supported providers
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        default_model: "gpt-4o",
        flavor: ApiFlavor::ChatCompletions,
    },
    ProviderSpec {
        name: "anthropic",
        display_name: "Anthropic",
        env_key: "ANTHROPIC_API_KEY",
        default_api_base: "https://api.anthropic.com/v1",
        default_model: "claude-3-5-sonnet-20241022",
        flavor: ApiFlavor::AnthropicMessages,
    },
    // Groq serves an OpenAI-compatible API under /openai/v1
    ProviderSpec {
        name: "groq",
        display_name: "Groq",
        env_key: "GROQ_API_KEY",
        default_api_base: "https://api.groq.com/openai/v1",
        default_model: "llama3-70b-8192",
        flavor: ApiFlavor::ChatCompletions,
    },
];

// ─────────────────────────────────────────────
// Lookup functions
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Provider config lives in core.
pub use carebot_core::config::schema::ProviderConfig;

/// Pair every spec with its config, keeping only providers that have a key.
pub fn configured_providers(
    providers: &HashMap<String, ProviderConfig>,
) -> Vec<(&'static ProviderSpec, &ProviderConfig)> {
    PROVIDERS
        .iter()
        .filter_map(|spec| {
            providers
                .get(spec.name)
                .filter(|c| c.is_configured())
                .map(|c| (spec, c))
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
