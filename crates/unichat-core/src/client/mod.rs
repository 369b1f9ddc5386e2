//! Chat backend client module

mod backend;
mod types;

pub use backend::{BackendClient, ChatBackend};
pub use types::{ChatReply, ChatRequest, ChatResponse, MemoryPayload};
