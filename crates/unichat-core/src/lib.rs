//! unichat-core: University Assistant Chat Core Library
//!
//! チャットセッションの状態管理、バックエンドとの通信、
//! 入力補完、会話のエクスポートのコア機能を提供します。

pub mod client;
pub mod config;
pub mod connectivity;
pub mod conversation;
pub mod error;
pub mod export;
pub mod language;
pub mod session;
pub mod suggest;

pub use client::{BackendClient, ChatBackend, ChatReply};
pub use config::{ApiConfig, ChatConfig, Config};
pub use connectivity::{ConnectionState, ConnectivityHandle, ConnectivityMonitor};
pub use conversation::{ChatController, PendingSend, SendOutcome};
pub use error::{Error, Result};
pub use language::Language;
pub use session::{ChatSession, ContextMap, Message, MessageKind, SessionId, SessionStore};
pub use suggest::suggestions;
