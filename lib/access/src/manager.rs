//! Session lifecycle: identity in, token out, and back again.

use std::sync::Arc;

use chrono::Duration;

use crate::error::SessionStoreError;
use crate::identity::Identity;
use crate::session::{Session, SessionToken};
use crate::store::{SessionStore, generate_session_token};

/// Creates, resolves, and destroys sessions against an injected store.
///
/// This is the only component that writes to the session store; the route
/// guard reads through [`SessionManager::resolve`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    /// Creates a manager issuing sessions with the given lifetime.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Establishes a session for an identity and returns the cookie token.
    pub async fn create(&self, identity: Identity) -> Result<SessionToken, SessionStoreError> {
        let token = generate_session_token();
        let session = Session::new(token.clone(), identity, self.ttl);
        self.store.insert(session).await?;
        Ok(token)
    }

    /// Resolves a token to its identity.
    ///
    /// Returns `None` for unknown and expired tokens; an expired session is
    /// removed during the lookup.
    pub async fn resolve(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Identity>, SessionStoreError> {
        match self.store.get(token).await? {
            Some(session) if session.is_expired() => {
                self.store.remove(token).await?;
                Ok(None)
            }
            Some(session) => Ok(Some(session.identity().clone())),
            None => Ok(None),
        }
    }

    /// Destroys a session. Destroying an absent token is a no-op.
    pub async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.store.remove(token).await
    }

    /// Returns the configured session lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
