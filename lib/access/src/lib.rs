//! Identity, session, and credential primitives for the fleet-console
//! access gateway.
//!
//! This crate provides:
//! - Authenticated principals (`Identity`, `Role`)
//! - Session records (`Session`, `SessionToken`) and the `SessionStore`
//!   trait with an in-memory implementation
//! - The session lifecycle (`SessionManager`)
//! - Local administrator authentication (`AdminCredentials`)
//! - Federated identity provider configuration (`ProviderConfig`)
//!
//! # Access Model
//!
//! Two authenticated roles exist: `user` (any successfully authenticated
//! federated identity) and `admin` (the single configured operator).
//! Sessions are ephemeral by design; restarting the process with the
//! in-memory store signs everyone out, because there is no local table of
//! record for federated users.
//!
//! # Example
//!
//! ```
//! use fleet_console_access::{AdminCredentials, Role};
//!
//! let admin = AdminCredentials::new("ops".to_string(), "s3cret".to_string());
//!
//! let identity = admin.authenticate("ops", "s3cret").expect("valid credentials");
//! assert_eq!(identity.id(), "admin");
//! assert_eq!(identity.role(), Role::Admin);
//!
//! assert!(admin.authenticate("ops", "wrong").is_err());
//! ```

pub mod admin;
pub mod error;
pub mod identity;
pub mod manager;
pub mod provider;
pub mod session;
pub mod store;

// Re-export main types at crate root
pub use admin::{AdminCredentials, NullAllowList, OperatorAllowList};
pub use error::{AdminAuthError, AllowListError, SessionStoreError};
pub use identity::{ADMIN_ID, Identity, Role};
pub use manager::SessionManager;
pub use provider::ProviderConfig;
pub use session::{Session, SessionToken};
pub use store::{MemorySessionStore, SessionStore, generate_session_token};
