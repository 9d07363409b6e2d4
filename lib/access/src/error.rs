//! Error types for the access crate.
//!
//! Every fallible boundary returns an explicit typed error; none of these
//! are used for control flow inside a happy path.

use std::fmt;

/// Local administrator authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuthError {
    /// The username/password pair did not match the configured credential.
    InvalidCredentials,
}

impl fmt::Display for AdminAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid administrator credentials"),
        }
    }
}

impl std::error::Error for AdminAuthError {}

/// Session store backend failure.
///
/// The in-memory store never produces this; backends with real I/O report
/// their failures here so callers can log and degrade to "no session."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    /// The backing store failed.
    Backend {
        /// Backend-specific description.
        details: String,
    },
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { details } => write!(f, "session store error: {details}"),
        }
    }
}

impl std::error::Error for SessionStoreError {}

/// Failure while appending to the externally owned operator allow-list.
///
/// Never fatal to a login; callers log it and continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowListError {
    /// Collaborator-specific description.
    pub details: String,
}

impl fmt::Display for AllowListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operator allow-list error: {}", self.details)
    }
}

impl std::error::Error for AllowListError {}
