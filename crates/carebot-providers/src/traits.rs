//! Provider dispatch trait — the seam between the conversation router and
//! the outbound HTTP clients.

use async_trait::async_trait;
use carebot_core::types::Message;

use crate::error::DispatchError;

/// Upper bound on generated tokens for every provider call.
pub const MAX_OUTPUT_TOKENS: u32 = 500;

/// Sends one prompt to a named provider and returns its reply text.
///
/// Implemented by [`crate::ProviderDispatcher`] for real backends; tests
/// substitute scripted implementations.
#[async_trait]
pub trait ChatDispatch: Send + Sync {
    /// Call `provider` with `history` followed by a user message holding `prompt`.
    ///
    /// Fails with a configuration error, without any network traffic, when
    /// the provider is unknown or has no credential. Upstream failures are
    /// returned as-is; nothing is retried.
    async fn call(
        &self,
        provider: &str,
        prompt: &str,
        history: &[Message],
    ) -> Result<String, DispatchError>;
}
