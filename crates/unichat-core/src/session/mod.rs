//! Session management module
//!
//! Provides the chat session model and the in-memory store that owns it.

mod store;
mod types;

pub use store::SessionStore;
pub use types::{ChatSession, ContextMap, GREETING, Message, MessageKind, SessionId};
