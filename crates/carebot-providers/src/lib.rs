//! LLM provider layer for Carebot.
//!
//! # Architecture
//!
//! - [`traits::ChatDispatch`] — the call contract the router depends on
//! - [`registry`] — static specs for the supported providers
//! - [`flavor::ApiFlavor`] — per-flavor request building and reply extraction
//! - [`http_provider::HttpProvider`] — one configured backend
//! - [`http_provider::ProviderDispatcher`] — name → backend table

pub mod error;
pub mod flavor;
pub mod http_provider;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use error::{DispatchError, ErrorKind};
pub use flavor::ApiFlavor;
pub use http_provider::{HttpProvider, ProviderDispatcher};
pub use registry::{find_by_name, ProviderConfig, ProviderSpec, PROVIDERS};
pub use traits::{ChatDispatch, MAX_OUTPUT_TOKENS};
