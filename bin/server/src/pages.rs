//! Page registry for the single-page console.
//!
//! Pages register themselves once at startup; the registry is read-only at
//! request time. Lookup is exact-match after trailing-slash normalization,
//! with the root path aliased onto the trips page. A duplicate registration
//! is a startup failure, never a silent overwrite.

use std::collections::HashMap;
use std::fmt;

use fleet_console_access::Identity;

pub mod admin;
pub mod driver_documents;
pub mod map;
pub mod stats;
pub mod trips;

/// The root path resolves to the trips page.
const ROOT_ALIAS: &str = "/trips";

/// Renderable content returned by a page handler.
///
/// The shell places the body inside its content region; what the body
/// contains is the page's business, not the gateway's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Page title, shown in the document title.
    pub title: String,
    /// HTML fragment for the content region.
    pub body: String,
}

/// Context handed to a page handler.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Identity attached by the route guard; absent on public paths.
    pub identity: Option<Identity>,
    /// The normalized path being rendered.
    pub path: String,
}

/// A registered page handler.
pub type PageHandler = fn(&PageContext) -> PageContent;

struct PageEntry {
    handler: PageHandler,
    admin_only: bool,
}

/// Outcome of resolving a path for an identity.
#[derive(Debug)]
pub enum Resolution {
    /// The page rendered.
    Page(PageContent),
    /// No page is registered at this path.
    NotFound,
    /// The page is admin-restricted and the caller is not an admin.
    AccessDenied,
}

/// Registration failure; surfaces at startup, before the listener binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two pages claimed the same logical path.
    DuplicatePath {
        /// The contested normalized path.
        path: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePath { path } => {
                write!(f, "page already registered at '{path}'")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Mapping from logical path to page handler.
#[derive(Default)]
pub struct PageRegistry {
    entries: HashMap<String, PageEntry>,
}

impl PageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page available to every authenticated identity.
    pub fn register(&mut self, path: &str, handler: PageHandler) -> Result<(), RegistryError> {
        self.insert(path, handler, false)
    }

    /// Registers an admin-restricted page.
    pub fn register_admin(
        &mut self,
        path: &str,
        handler: PageHandler,
    ) -> Result<(), RegistryError> {
        self.insert(path, handler, true)
    }

    fn insert(
        &mut self,
        path: &str,
        handler: PageHandler,
        admin_only: bool,
    ) -> Result<(), RegistryError> {
        let path = normalize(path);
        if self.entries.contains_key(&path) {
            return Err(RegistryError::DuplicatePath { path });
        }
        self.entries.insert(path, PageEntry { handler, admin_only });
        Ok(())
    }

    /// Resolves a path for an identity.
    ///
    /// An admin-restricted page requested by a non-admin identity is an
    /// access-denied render; the handler is not invoked.
    #[must_use]
    pub fn resolve(&self, path: &str, identity: Option<&Identity>) -> Resolution {
        let path = normalize(path);
        let Some(entry) = self.entries.get(&path) else {
            return Resolution::NotFound;
        };

        if entry.admin_only && !identity.is_some_and(Identity::is_admin) {
            return Resolution::AccessDenied;
        }

        let context = PageContext {
            identity: identity.cloned(),
            path,
        };
        Resolution::Page((entry.handler)(&context))
    }

    /// Returns the number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no pages are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trims trailing slashes and folds the root path onto its alias.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_ALIAS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escapes text for safe interpolation into an HTML fragment.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builds the console's page registry.
///
/// Fails when two pages claim the same path; `main` treats that as a
/// startup error.
pub fn default_registry() -> Result<PageRegistry, RegistryError> {
    let mut registry = PageRegistry::new();
    registry.register("/trips", trips::page)?;
    registry.register("/stats", stats::page)?;
    registry.register("/map", map::page)?;
    registry.register_admin("/admin", admin::page)?;
    registry.register_admin("/drivers/documents", driver_documents::page)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Identity {
        Identity::federated("sub_1".to_string())
    }

    fn page_a(_context: &PageContext) -> PageContent {
        PageContent {
            title: "A".to_string(),
            body: "<p>a</p>".to_string(),
        }
    }

    fn page_b(_context: &PageContext) -> PageContent {
        PageContent {
            title: "B".to_string(),
            body: "<p>b</p>".to_string(),
        }
    }

    #[test]
    fn duplicate_registration_fails_loudly() {
        let mut registry = PageRegistry::new();
        registry.register("/a", page_a).expect("first registration");

        let err = registry.register("/a", page_b).expect_err("duplicate");
        assert_eq!(
            err,
            RegistryError::DuplicatePath {
                path: "/a".to_string()
            }
        );
        // The original handler survived
        match registry.resolve("/a", Some(&user())) {
            Resolution::Page(content) => assert_eq!(content.title, "A"),
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[test]
    fn root_and_trips_are_the_same_logical_path() {
        let mut registry = PageRegistry::new();
        registry.register("/trips", page_a).expect("register");

        // Registering the root after /trips collides instead of overwriting
        let err = registry.register("/", page_b).expect_err("alias collision");
        assert!(matches!(err, RegistryError::DuplicatePath { .. }));
    }

    #[test]
    fn resolving_root_and_trips_returns_the_same_handler() {
        let registry = default_registry().expect("registry");
        let identity = user();

        let from_root = match registry.resolve("/", Some(&identity)) {
            Resolution::Page(content) => content,
            other => panic!("expected page, got {other:?}"),
        };
        let from_trips = match registry.resolve("/trips", Some(&identity)) {
            Resolution::Page(content) => content,
            other => panic!("expected page, got {other:?}"),
        };

        assert_eq!(from_root, from_trips);
    }

    #[test]
    fn trailing_slashes_are_normalized() {
        let registry = default_registry().expect("registry");
        match registry.resolve("/stats/", Some(&user())) {
            Resolution::Page(content) => assert_eq!(content.title, "Stats"),
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[test]
    fn unregistered_path_is_not_found() {
        let registry = default_registry().expect("registry");
        assert!(matches!(
            registry.resolve("/nope", Some(&user())),
            Resolution::NotFound
        ));
    }

    #[test]
    fn admin_page_denies_user_role_without_invoking_the_handler() {
        let registry = default_registry().expect("registry");
        assert!(matches!(
            registry.resolve("/admin", Some(&user())),
            Resolution::AccessDenied
        ));
        assert!(matches!(
            registry.resolve("/drivers/documents", Some(&user())),
            Resolution::AccessDenied
        ));
    }

    #[test]
    fn admin_page_renders_for_admin_role() {
        let registry = default_registry().expect("registry");
        let admin = Identity::admin();

        assert!(matches!(
            registry.resolve("/admin", Some(&admin)),
            Resolution::Page(_)
        ));
        assert!(matches!(
            registry.resolve("/drivers/documents", Some(&admin)),
            Resolution::Page(_)
        ));
    }

    #[test]
    fn admin_page_denies_anonymous_resolution() {
        let registry = default_registry().expect("registry");
        assert!(matches!(
            registry.resolve("/admin", None),
            Resolution::AccessDenied
        ));
    }

    #[test]
    fn default_registry_registers_the_console_pages() {
        let registry = default_registry().expect("registry");
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
