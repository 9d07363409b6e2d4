//! Authentication for the fleet-console gateway.
//!
//! This module provides:
//! - The federated (OAuth2) login flow against the identity provider
//! - The local administrator login
//! - The route guard fronting every page
//!
//! # Authorization Model
//!
//! Authorization here is page-level only. The route guard decides
//! authenticated or not; the page registry decides whether an authenticated
//! identity may see an admin-restricted page. Roles are fixed at login time
//! and live in the session, so a role change takes effect on the next
//! login, bounded by the session lifetime.

pub mod middleware;
pub mod oidc;
pub mod routes;

pub use middleware::{OptionalUser, PublicPaths, route_guard};
pub use oidc::OidcClient;
pub use routes::{admin_login, callback, login, login_form, logout};

use std::sync::Arc;

use fleet_console_access::{AdminCredentials, OperatorAllowList, SessionManager};

use crate::config::SessionConfig;
use crate::pages::PageRegistry;

/// Shared application state.
pub struct AppState {
    /// Session lifecycle over the injected store.
    pub sessions: SessionManager,
    /// OAuth2 client for the federated flow.
    pub oidc_client: OidcClient,
    /// Local administrator credential.
    pub admin: AdminCredentials,
    /// Externally owned operator allow-list.
    pub allow_list: Arc<dyn OperatorAllowList>,
    /// Session and cookie configuration.
    pub session_config: SessionConfig,
    /// Page registry, read-only after startup.
    pub pages: PageRegistry,
    /// Public-path allow-list, read-only after startup.
    pub public_paths: PublicPaths,
}
