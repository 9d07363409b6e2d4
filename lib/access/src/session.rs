//! Session records binding an opaque token to an identity.
//!
//! Sessions are created after a successful login (federated or local),
//! looked up on every guarded request, and destroyed on logout or expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Opaque session token carried in the session cookie.
///
/// Tokens are generated by [`crate::store::generate_session_token`] and have
/// no structure a caller may rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Creates a token from a string.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A server-side session.
///
/// The identity is part of the record itself, so a stored session always
/// carries a live identity; "session without identity" is unrepresentable
/// and lookups either authenticate fully or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The opaque token this session is stored under.
    token: SessionToken,
    /// The authenticated principal.
    identity: Identity,
    /// When the session was created.
    created_at: DateTime<Utc>,
    /// When the session expires.
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session valid for the given duration.
    #[must_use]
    pub fn new(token: SessionToken, identity: Identity, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            token,
            identity,
            created_at: now,
            expires_at: now + duration,
        }
    }

    /// Returns the session token.
    #[must_use]
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Returns the authenticated identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns when the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the session is still valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }
}
