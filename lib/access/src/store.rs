//! Session storage.
//!
//! The gateway owns no database; sessions live behind the [`SessionStore`]
//! trait, which is injected into the session lifecycle and the route guard.
//!
//! # Concurrency contract
//!
//! Implementations must be safe under concurrent invocation: operations on
//! different tokens are independent, and a `remove` racing a `get` on the
//! same token must yield either the complete session or nothing. Backends
//! with real I/O should bound their access with a timeout.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use base64::Engine;
use rand::RngCore;

use crate::error::SessionStoreError;
use crate::session::{Session, SessionToken};

/// Random bytes behind a session token.
const TOKEN_BYTES: usize = 32;

/// Generates a fresh opaque session token.
///
/// 32 bytes from the thread-local CSPRNG, base64url encoded without padding.
#[must_use]
pub fn generate_session_token() -> SessionToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    SessionToken::new(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Storage backend for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a session under its token.
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError>;

    /// Looks up a session by token.
    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError>;

    /// Removes a session. Removing an absent token is not an error.
    async fn remove(&self, token: &SessionToken) -> Result<(), SessionStoreError>;

    /// Removes all expired sessions, returning how many were dropped.
    async fn remove_expired(&self) -> Result<u64, SessionStoreError>;
}

/// In-memory session store.
///
/// A single `RwLock` guards the map; lookups take the shared lock so
/// concurrent resolves do not serialize behind each other.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Returns true if no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.token().clone(), session);
        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(token);
        Ok(())
    }

    async fn remove_expired(&self) -> Result<u64, SessionStoreError> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.is_valid());
        Ok((before - sessions.len()) as u64)
    }
}
