//! Session types

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque session identifier
pub type SessionId = String;

/// Conversational facts remembered by the backend for a session
pub type ContextMap = serde_json::Map<String, serde_json::Value>;

/// Greeting seeded into every new session
pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

static LAST_MESSAGE_ID: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp, bumped so that ids never repeat or go backwards.
fn next_message_id() -> u64 {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_MESSAGE_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_MESSAGE_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Bot,
}

impl MessageKind {
    /// Sender label used in transcripts
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::User => "You",
            MessageKind::Bot => "AI",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    /// Local time of creation, `HH:MM`
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with the current local time
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: next_message_id(),
            kind,
            content: content.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageKind::User, content)
    }

    /// Create a bot message
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Bot, content)
    }

    /// Override the display timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn is_bot(&self) -> bool {
        self.kind == MessageKind::Bot
    }
}

/// Represents a conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier
    pub id: SessionId,
    /// Display label
    pub name: String,
    /// Conversation messages in insertion order
    pub messages: Vec<Message>,
    /// Updated on every mutation
    pub last_activity: DateTime<Utc>,
    /// Memory context returned by the backend
    pub context: ContextMap,
}

impl ChatSession {
    /// Create a new session seeded with the greeting message
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            messages: vec![Message::bot(GREETING)],
            last_activity: Utc::now(),
            context: ContextMap::new(),
        }
    }

    /// Add a message to the session
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Replace the whole context
    pub fn set_context(&mut self, context: ContextMap) {
        self.context = context;
        self.touch();
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Get message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn find_message(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = ChatSession::new("Chat 1");
        assert!(!session.id.is_empty());
        assert_eq!(session.name, "Chat 1");
        assert_eq!(session.messages.len(), 1);
        assert!(session.messages[0].is_bot());
        assert_eq!(session.messages[0].content, GREETING);
        assert!(session.context.is_empty());
    }

    #[test]
    fn test_add_message_updates_activity() {
        let mut session = ChatSession::new("Chat 1");
        let before = session.last_activity;
        session.add_message(Message::user("Hello"));
        assert_eq!(session.messages.len(), 2);
        assert!(session.last_activity >= before);
    }

    #[test]
    fn test_message_ids_are_monotonic() {
        let ids: Vec<u64> = (0..100).map(|_| Message::user("x").id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_message_timestamp_format() {
        let message = Message::bot("hi");
        assert_eq!(message.timestamp.len(), 5);
        assert_eq!(&message.timestamp[2..3], ":");
    }
}
