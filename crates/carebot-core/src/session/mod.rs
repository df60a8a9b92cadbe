//! Session store — per-user conversation state held in process memory.
//!
//! Sessions are created lazily on first access, never expire and are never
//! written to disk; they are lost when the process exits.

pub mod store;

pub use store::{InMemorySessionStore, SessionStore, SessionUpdate};
