//! Message send round-trip
//!
//! A send appends the user's message right away, marks the session pending,
//! asks the backend (or the offline fallback) for a reply and appends that
//! reply to the session the message was sent from. Backend failures become
//! canned bot messages; they are never returned to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::{ChatBackend, ChatReply};
use crate::config::Config;
use crate::connectivity::ConnectivityMonitor;
use crate::language::Language;
use crate::session::{Message, SessionId, SessionStore};
use crate::Result;

/// Reply used when the backend is not reachable
pub const OFFLINE_REPLY: &str = "I understand your message. How else can I assist you?";

/// Reply used when a backend request fails
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// A request in flight, bound to the session it was sent from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub session_id: SessionId,
    pub seq: u64,
    /// Trimmed message text
    pub text: String,
    /// Language selected when the message was sent
    pub language: Language,
}

/// Result of trying to start a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty or whitespace only
    Ignored,
    /// The active session already waits for a reply
    Busy,
    /// The message was appended and a reply requested
    Sent(PendingSend),
}

struct ConversationState {
    store: SessionStore,
    /// Session id -> sequence number of its in-flight request
    pending: HashMap<SessionId, u64>,
    next_seq: u64,
}

impl ConversationState {
    /// Clear the pending marker if `pending` is still the request in flight
    fn release(&mut self, pending: &PendingSend) -> bool {
        if self.pending.get(&pending.session_id) != Some(&pending.seq) {
            return false;
        }
        self.pending.remove(&pending.session_id);
        true
    }
}

/// Releases the pending marker of a send whose future is dropped before
/// the reply is merged (timeouts, `select!`, aborted tasks).
struct PendingGuard {
    state: Arc<Mutex<ConversationState>>,
    pending: Option<PendingSend>,
}

impl PendingGuard {
    fn disarm(&mut self) {
        self.pending = None;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug!("Send #{} for session {} cancelled", pending.seq, pending.session_id);

        if let Ok(mut state) = self.state.try_lock() {
            state.release(&pending);
            return;
        }

        // Lock is busy; release from a task once it frees up
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let state = Arc::clone(&self.state);
                handle.spawn(async move {
                    state.lock().await.release(&pending);
                });
            }
            Err(_) => warn!(
                "Could not release send #{} for session {}: no runtime",
                pending.seq, pending.session_id
            ),
        }
    }
}

/// Drives the session store from user input and backend replies
#[derive(Clone)]
pub struct ChatController {
    state: Arc<Mutex<ConversationState>>,
    backend: Arc<dyn ChatBackend>,
    connectivity: ConnectivityMonitor,
    offline_delay: Duration,
}

impl ChatController {
    pub fn new(
        store: SessionStore,
        backend: Arc<dyn ChatBackend>,
        connectivity: ConnectivityMonitor,
        offline_delay: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConversationState {
                store,
                pending: HashMap::new(),
                next_seq: 0,
            })),
            backend,
            connectivity,
            offline_delay,
        }
    }

    /// Build a controller with a fresh store from configuration
    pub fn from_config(
        config: &Config,
        backend: Arc<dyn ChatBackend>,
        connectivity: ConnectivityMonitor,
    ) -> Self {
        Self::new(
            SessionStore::with_language(config.chat.language()),
            backend,
            connectivity,
            config.chat.offline_delay(),
        )
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    /// Read from the store
    pub async fn read<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.store)
    }

    /// Mutate the store without touching pending sends.
    ///
    /// Session deletion goes through [`ChatController::delete_session`].
    async fn update<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state.store)
    }

    /// Rename the active session
    pub async fn rename_active(&self, name: &str) -> Result<()> {
        self.update(|store| {
            let id = store.active_id().to_string();
            store.rename_session(&id, name)
        })
        .await
    }

    pub async fn set_language(&self, language: Language) {
        self.update(|store| store.set_language(language)).await
    }

    /// Rate a bot message (1-5)
    pub async fn rate_message(&self, message_id: u64, rating: u8) -> Result<()> {
        self.update(|store| store.rate_message(message_id, rating)).await
    }

    /// Whether `session_id` waits for a reply (typing indicator)
    pub async fn is_pending(&self, session_id: &str) -> bool {
        self.state.lock().await.pending.contains_key(session_id)
    }

    /// Whether the active session waits for a reply
    pub async fn is_active_pending(&self) -> bool {
        let state = self.state.lock().await;
        state.pending.contains_key(state.store.active_id())
    }

    /// Start a new chat session and tell the backend to clear its conversation.
    ///
    /// The clear request is fire-and-forget.
    pub async fn new_chat(&self) -> SessionId {
        let id = self.update(|store| store.create_session()).await;

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.clear_conversation().await {
                debug!("Conversation clear failed: {}", e);
            }
        });

        id
    }

    pub async fn switch_session(&self, id: &str) -> Result<()> {
        self.update(|store| store.switch_session(id)).await
    }

    /// Delete a session; a reply still in flight for it will be dropped
    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.store.delete_session(id)?;
        state.pending.remove(id);
        Ok(())
    }

    /// Append the user's message to the active session and mark it pending.
    pub async fn begin_send(&self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let mut state = self.state.lock().await;
        let session_id = state.store.active_id().to_string();

        if state.pending.contains_key(&session_id) {
            debug!("Session {} already waiting for a reply", session_id);
            return SendOutcome::Busy;
        }

        let language = state.store.language();
        if let Err(e) = state.store.append_message(&session_id, Message::user(text)) {
            warn!("Could not append message to active session {}: {}", session_id, e);
            return SendOutcome::Ignored;
        }

        state.next_seq += 1;
        let seq = state.next_seq;
        state.pending.insert(session_id.clone(), seq);

        SendOutcome::Sent(PendingSend {
            session_id,
            seq,
            text: text.to_string(),
            language,
        })
    }

    /// Produce the bot reply for a pending send.
    ///
    /// Uses the backend when connected, otherwise waits the offline delay and
    /// returns the canned reply. Request failures give the canned error reply.
    pub async fn fetch_reply(&self, pending: &PendingSend) -> ChatReply {
        if !self.connectivity.is_connected() {
            tokio::time::sleep(self.offline_delay).await;
            return ChatReply::text(OFFLINE_REPLY);
        }

        match self.backend.chat(&pending.text, pending.language).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Error sending message: {}", e);
                ChatReply::text(ERROR_REPLY)
            }
        }
    }

    /// Merge a reply into the session the request was sent from.
    ///
    /// Returns `false` when the session was deleted or the request is no
    /// longer the one in flight; the reply is dropped in that case.
    pub async fn complete(&self, pending: &PendingSend, reply: ChatReply) -> bool {
        let mut state = self.state.lock().await;

        if !state.release(pending) {
            warn!(
                "Dropping reply #{} for session {}: request no longer pending",
                pending.seq, pending.session_id
            );
            return false;
        }

        if !state.store.contains(&pending.session_id) {
            warn!("Dropping reply for deleted session {}", pending.session_id);
            return false;
        }

        if let Some(context) = reply.context {
            if let Err(e) = state.store.replace_context(&pending.session_id, context) {
                warn!("Could not replace context of session {}: {}", pending.session_id, e);
            }
        }
        if let Err(e) = state
            .store
            .append_message(&pending.session_id, Message::bot(reply.text))
        {
            warn!("Could not append reply to session {}: {}", pending.session_id, e);
            return false;
        }

        info!("Reply #{} appended to session {}", pending.seq, pending.session_id);
        true
    }

    /// Give up on a pending send without a reply.
    ///
    /// Frees the session for the next send. Returns `false` when the request
    /// was already completed or superseded.
    pub async fn cancel(&self, pending: &PendingSend) -> bool {
        let released = self.state.lock().await.release(pending);
        if released {
            debug!("Send #{} for session {} cancelled", pending.seq, pending.session_id);
        }
        released
    }

    /// Full round-trip: append, fetch a reply, merge it back.
    ///
    /// Dropping the returned future before it finishes releases the session.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let outcome = self.begin_send(input).await;
        if let SendOutcome::Sent(pending) = &outcome {
            let mut guard = PendingGuard {
                state: Arc::clone(&self.state),
                pending: Some(pending.clone()),
            };
            let reply = self.fetch_reply(pending).await;
            self.complete(pending, reply).await;
            guard.disarm();
        }
        outcome
    }
}
