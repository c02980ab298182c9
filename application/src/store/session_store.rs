//! Session store: the single owner of canonical session state.
//!
//! Holds one [`ChatSession`] behind a `tokio::sync::watch` channel.
//! Subscribers immediately observe the latest value and then every
//! subsequent update (replay-latest semantics). All mutations are pure
//! `ChatSession -> ChatSession` transforms applied atomically; observers
//! never see interleaved partial states.
//!
//! Single-writer by convention: only the orchestration use cases mutate.

use chatbridge_domain::ChatSession;
use tokio::sync::watch;

/// Observable container for one chat session
pub struct SessionStore {
    tx: watch::Sender<ChatSession>,
}

impl SessionStore {
    /// Create a store holding a fresh session with empty state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ChatSession::new());
        Self { tx }
    }

    /// Synchronous snapshot of the current session
    pub fn current(&self) -> ChatSession {
        self.tx.borrow().clone()
    }

    /// Subscribe to session updates.
    ///
    /// The receiver replays the latest value to new subscribers, then
    /// delivers every subsequent update.
    pub fn subscribe(&self) -> watch::Receiver<ChatSession> {
        self.tx.subscribe()
    }

    /// Apply a pure copy-on-write transform atomically
    pub fn update<F>(&self, transform: F)
    where
        F: FnOnce(ChatSession) -> ChatSession,
    {
        self.tx.send_modify(|session| {
            *session = transform(session.clone());
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
