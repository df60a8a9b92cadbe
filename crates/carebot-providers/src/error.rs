//! Dispatch errors.
//!
//! Two families: configuration errors (the provider cannot be called at all)
//! and upstream errors (the call was made and failed). Callers that only
//! need the family use [`DispatchError::kind`].

use thiserror::Error;

/// Coarse classification of a [`DispatchError`], for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Upstream,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream => "upstream",
        }
    }
}

/// Why a provider call failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No registry entry for this provider name.
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    /// The provider exists but has no API key.
    #[error("provider '{provider}' is not configured (set {env_key})")]
    MissingCredential {
        provider: &'static str,
        env_key: &'static str,
    },

    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Success status, but no reply text where the flavor expects it.
    #[error("{provider} returned a reply without text")]
    MalformedReply { provider: &'static str },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownProvider(_) | DispatchError::MissingCredential { .. } => {
                ErrorKind::Configuration
            }
            DispatchError::Transport { .. }
            | DispatchError::Status { .. }
            | DispatchError::MalformedReply { .. } => ErrorKind::Upstream,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert!(DispatchError::UnknownProvider("x".into()).is_configuration());
        assert!(DispatchError::MissingCredential {
            provider: "groq",
            env_key: "GROQ_API_KEY"
        }
        .is_configuration());
        assert_eq!(
            DispatchError::Status {
                provider: "OpenAI",
                status: 500,
                body: String::new()
            }
            .kind(),
            ErrorKind::Upstream
        );
        assert_eq!(
            DispatchError::MalformedReply { provider: "Anthropic" }.kind(),
            ErrorKind::Upstream
        );
    }

    #[test]
    fn test_messages() {
        let err = DispatchError::MissingCredential {
            provider: "anthropic",
            env_key: "ANTHROPIC_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "provider 'anthropic' is not configured (set ANTHROPIC_API_KEY)"
        );

        let err = DispatchError::Status {
            provider: "Groq",
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "Groq returned HTTP 429: rate limited");
    }
}
