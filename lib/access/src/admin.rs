//! Local administrator authentication.
//!
//! A single operator credential supplied by configuration, for access when
//! the identity provider is unavailable. This is intentionally not a
//! credential store and not extensible to multiple accounts.

use async_trait::async_trait;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::{AdminAuthError, AllowListError};
use crate::identity::Identity;

/// The configured local administrator credential.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Verifies a username/password pair against the configured secret.
    ///
    /// Both comparisons run in constant time and are combined before the
    /// branch; on success the fixed administrator identity is returned.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity, AdminAuthError> {
        let username_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());

        if bool::from(username_ok & password_ok) {
            Ok(Identity::admin())
        } else {
            Err(AdminAuthError::InvalidCredentials)
        }
    }
}

/// Externally owned operator allow-list.
///
/// The admin login path appends the operator on first use. The table does
/// not belong to this system; a failure here is logged by the caller and
/// never blocks the login.
#[async_trait]
pub trait OperatorAllowList: Send + Sync {
    /// Ensures the operator is present in the allow-list.
    async fn ensure(&self, username: &str) -> Result<(), AllowListError>;
}

/// Allow-list that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAllowList;

#[async_trait]
impl OperatorAllowList for NullAllowList {
    async fn ensure(&self, _username: &str) -> Result<(), AllowListError> {
        Ok(())
    }
}
