//! In-memory session store
//!
//! Holds every chat session, which one is active, message ratings and the
//! selected language. All mutations go through methods that keep the
//! collection non-empty and the active id valid.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::language::Language;
use crate::session::{ChatSession, ContextMap, Message, SessionId};
use crate::{Error, Result};

/// Ordered collection of chat sessions with exactly one active session
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active: SessionId,
    /// Message id -> rating (1..=5), bot messages only
    ratings: HashMap<u64, u8>,
    language: Language,
    /// Sessions created so far, used for default names
    created: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store holding a single fresh session
    pub fn new() -> Self {
        Self::with_language(Language::default())
    }

    /// Create a store with the given language selected
    pub fn with_language(language: Language) -> Self {
        let first = ChatSession::new("Chat 1");
        Self {
            active: first.id.clone(),
            sessions: vec![first],
            ratings: HashMap::new(),
            language,
            created: 1,
        }
    }

    /// Create a new session and make it active
    pub fn create_session(&mut self) -> SessionId {
        self.created += 1;
        let session = ChatSession::new(format!("Chat {}", self.created));
        let id = session.id.clone();
        info!("Creating new session: {}", id);

        self.sessions.push(session);
        self.active = id.clone();
        id
    }

    /// Make `id` the active session
    pub fn switch_session(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::SessionNotFound(id.to_string()));
        }
        debug!("Switching active session to {}", id);
        self.active = id.to_string();
        Ok(())
    }

    /// Delete a session. The last remaining session cannot be deleted.
    ///
    /// When the active session is removed, the first remaining session
    /// becomes active.
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

        if self.sessions.len() == 1 {
            return Err(Error::LastSession);
        }

        let removed = self.sessions.remove(index);
        for message in &removed.messages {
            self.ratings.remove(&message.id);
        }

        if self.active == removed.id {
            self.active = self.sessions[0].id.clone();
        }

        info!("Deleted session: {}", removed.id);
        Ok(())
    }

    /// Append a message to a session
    pub fn append_message(&mut self, session_id: &str, message: Message) -> Result<()> {
        self.get_mut(session_id)?.add_message(message);
        Ok(())
    }

    /// Overwrite the context of a session. Keys missing from `context` are dropped.
    pub fn replace_context(&mut self, session_id: &str, context: ContextMap) -> Result<()> {
        let session = self.get_mut(session_id)?;
        debug!("Replacing context of session {} ({} keys)", session_id, context.len());
        session.set_context(context);
        Ok(())
    }

    pub fn rename_session(&mut self, session_id: &str, name: impl Into<String>) -> Result<()> {
        self.get_mut(session_id)?.rename(name);
        Ok(())
    }

    /// The active session
    pub fn active_session(&self) -> &ChatSession {
        self.get(&self.active).unwrap_or(&self.sessions[0])
    }

    pub fn active_id(&self) -> &str {
        &self.active
    }

    /// Messages of the active session
    pub fn active_messages(&self) -> &[Message] {
        &self.active_session().messages
    }

    /// Context of the active session
    pub fn active_context(&self) -> &ContextMap {
        &self.active_session().context
    }

    /// All sessions in creation order
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Get session count
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        info!("Language set to {}", language.code());
        self.language = language;
    }

    /// Rate a bot message from 1 to 5. Re-rating overwrites.
    pub fn rate_message(&mut self, message_id: u64, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(Error::InvalidRating(rating));
        }

        let message = self
            .sessions
            .iter()
            .find_map(|s| s.find_message(message_id))
            .ok_or(Error::MessageNotFound(message_id))?;

        if !message.is_bot() {
            return Err(Error::NotRateable(message_id));
        }

        self.ratings.insert(message_id, rating);
        Ok(())
    }

    pub fn rating(&self, message_id: u64) -> Option<u8> {
        self.ratings.get(&message_id).copied()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut ChatSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }
}
