//! Carebot core — message and session types, session store, configuration.

pub mod config;
pub mod session;
pub mod types;
pub mod utils;

pub use types::{ChatState, Message, Role, Session};
