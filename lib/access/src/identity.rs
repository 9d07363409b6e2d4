//! Authenticated principal types.
//!
//! An [`Identity`] is created once, by either the federated login flow or
//! the local administrator login, and is carried unchanged inside the
//! session for as long as the session lives.

use serde::{Deserialize, Serialize};

/// Fixed id of the local administrator identity.
pub const ADMIN_ID: &str = "admin";

/// Access role attached to an identity.
///
/// Page-level gating is the only authorization this system performs, so two
/// roles are enough:
/// - `User`: standard access to the console pages
/// - `Admin`: additionally reaches the admin-restricted pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard user, authenticated through the federated provider.
    User,
    /// Administrator with access to the restricted pages.
    Admin,
}

impl Role {
    /// Returns true if this role grants access to admin-restricted pages.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The authenticated principal.
///
/// The id is the provider's subject claim for federated identities and the
/// fixed [`ADMIN_ID`] for the local administrator. Identities are never
/// persisted outside their session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable opaque id.
    id: String,
    /// Email address, if the provider supplied one.
    email: Option<String>,
    /// Display name, if the provider supplied one.
    display_name: Option<String>,
    /// Avatar image URL, if the provider supplied one.
    avatar_url: Option<String>,
    /// Access role.
    role: Role,
}

impl Identity {
    /// Creates a federated identity from a provider subject claim.
    ///
    /// Federated identities always carry role `user`; any successfully
    /// authenticated federated caller is accepted without an email or
    /// domain allow-list.
    #[must_use]
    pub fn federated(subject: String) -> Self {
        Self {
            id: subject,
            email: None,
            display_name: None,
            avatar_url: None,
            role: Role::User,
        }
    }

    /// Creates the local administrator identity.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            id: ADMIN_ID.to_string(),
            email: None,
            display_name: Some("Administrator".to_string()),
            avatar_url: None,
            role: Role::Admin,
        }
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    /// Returns the stable opaque id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the email address, if available.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the display name, if available.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the avatar URL, if available.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Returns the access role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns true if this identity reaches admin-restricted pages.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns a name suitable for display, falling back to email and id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn federated_identity_has_user_role() {
        let identity = Identity::federated("auth0|12345".to_string());
        assert_eq!(identity.id(), "auth0|12345");
        assert_eq!(identity.role(), Role::User);
        assert!(!identity.is_admin());
    }

    #[test]
    fn federated_identity_has_no_optional_claims() {
        let identity = Identity::federated("sub_1".to_string());
        assert!(identity.email().is_none());
        assert!(identity.display_name().is_none());
        assert!(identity.avatar_url().is_none());
    }

    #[test]
    fn admin_identity_has_fixed_id_and_role() {
        let identity = Identity::admin();
        assert_eq!(identity.id(), ADMIN_ID);
        assert_eq!(identity.role(), Role::Admin);
        assert!(identity.is_admin());
    }

    #[test]
    fn builder_sets_claims() {
        let identity = Identity::federated("sub_2".to_string())
            .with_email(Some("alice@example.com".to_string()))
            .with_display_name(Some("Alice".to_string()))
            .with_avatar_url(Some("https://cdn.example.com/a.png".to_string()));

        assert_eq!(identity.email(), Some("alice@example.com"));
        assert_eq!(identity.display_name(), Some("Alice"));
        assert_eq!(identity.avatar_url(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn label_prefers_display_name_then_email_then_id() {
        let bare = Identity::federated("sub_3".to_string());
        assert_eq!(bare.label(), "sub_3");

        let with_email = Identity::federated("sub_3".to_string())
            .with_email(Some("bob@example.com".to_string()));
        assert_eq!(with_email.label(), "bob@example.com");

        let with_name = with_email.with_display_name(Some("Bob".to_string()));
        assert_eq!(with_name.label(), "Bob");
    }

    #[test]
    fn role_is_admin() {
        assert!(!Role::User.is_admin());
        assert!(Role::Admin.is_admin());
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize");
        assert_eq!(json, "\"admin\"");

        let json = serde_json::to_string(&Role::User).expect("serialize");
        assert_eq!(json, "\"user\"");
    }

    #[test]
    fn identity_serialization_roundtrip() {
        let identity = Identity::federated("sub_4".to_string())
            .with_email(Some("carol@example.com".to_string()));

        let json = serde_json::to_string(&identity).expect("serialize");
        let parsed: Identity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(identity, parsed);
    }
}
