//! Route guard and request identity extraction.
//!
//! The guard is a single middleware layer in front of the whole router.
//! Public-path prefixes pass through untouched; every other request must
//! present a session cookie that resolves to an identity, which is then
//! attached to the request for handlers and the page resolver.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use fleet_console_access::{Identity, SessionToken};

use super::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Path of the login entry point the guard redirects to.
pub const LOGIN_PATH: &str = "/login";

/// Path prefixes that never require authentication.
///
/// The login entry point, the OAuth callback prefix, and the static-asset
/// prefix must always be members or federated login becomes impossible, so
/// they are compiled in. Configuration can add prefixes but never remove
/// these.
const DEFAULT_PUBLIC_PREFIXES: &[&str] = &["/login", "/auth/", "/assets/", "/healthz", "/hooks/"];

/// The set of path prefixes exempt from authentication.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PublicPaths {
    prefixes: Vec<String>,
}

impl PublicPaths {
    /// Builds the set from the compiled-in prefixes plus configured extras.
    #[must_use]
    pub fn with_extra(extra: &[String]) -> Self {
        let mut prefixes: Vec<String> = DEFAULT_PUBLIC_PREFIXES
            .iter()
            .map(|prefix| (*prefix).to_string())
            .collect();
        for prefix in extra {
            if !prefixes.contains(prefix) {
                prefixes.push(prefix.clone());
            }
        }
        Self { prefixes }
    }

    /// Returns true if the path is exempt from authentication.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| Self::prefix_matches(prefix, path))
    }

    // "/login" matches "/login" and "/login/..."; "/auth/" likewise matches
    // "/auth" itself. "/authx" matches neither.
    fn prefix_matches(prefix: &str, path: &str) -> bool {
        let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
        match path.strip_prefix(trimmed) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

/// Gate in front of every route.
///
/// Runs once per inbound request, before page resolution. Failure to
/// resolve a session is not an error; it is the signal to redirect to the
/// login entry point.
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if state.public_paths.matches(request.uri().path()) {
        return next.run(request).await;
    }

    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let token = SessionToken::from(cookie.value());
    match state.sessions.resolve(&token).await {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(None) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "session store unavailable during guard check");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

/// Extractor for the identity attached by the route guard.
///
/// `None` on public paths and for anonymous callers.
pub struct OptionalUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(parts.extensions.get::<Identity>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{
        CountingStore, app_state, location, provider_config, request, session_cookie_for,
    };
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use fleet_console_access::MemorySessionStore;
    use tower::ServiceExt;

    #[test]
    fn default_set_contains_mandatory_prefixes() {
        let paths = PublicPaths::default();
        assert!(paths.matches("/login"));
        assert!(paths.matches("/auth/login"));
        assert!(paths.matches("/auth/login/callback"));
        assert!(paths.matches("/assets/app.js"));
        assert!(paths.matches("/healthz"));
        assert!(paths.matches("/hooks/tickets"));
    }

    #[test]
    fn guarded_paths_do_not_match() {
        let paths = PublicPaths::default();
        assert!(!paths.matches("/"));
        assert!(!paths.matches("/trips"));
        assert!(!paths.matches("/stats"));
        assert!(!paths.matches("/admin"));
        // Prefix match is per path segment, not per character
        assert!(!paths.matches("/authx"));
        assert!(!paths.matches("/loginx"));
    }

    #[test]
    fn extra_prefixes_extend_the_set() {
        let paths = PublicPaths::with_extra(&["/metrics".to_string()]);
        assert!(paths.matches("/metrics"));
        assert!(paths.matches("/login"));
    }

    #[tokio::test]
    async fn anonymous_guarded_request_redirects_to_login() {
        let (router, _state) = crate::auth::test_support::test_router();

        let response = router
            .oneshot(request("GET", "/stats", None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_PATH);
    }

    #[tokio::test]
    async fn garbage_session_cookie_redirects_to_login() {
        let (router, _state) = crate::auth::test_support::test_router();

        let response = router
            .oneshot(request("GET", "/stats", Some("session=not-a-real-token")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn valid_session_reaches_the_page() {
        let (router, state) = crate::auth::test_support::test_router();
        let cookie = session_cookie_for(&state, false).await;

        let response = router
            .oneshot(request("GET", "/stats", Some(&cookie)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn public_path_never_consults_the_session_store() {
        let store = Arc::new(CountingStore::new(MemorySessionStore::new()));
        let state = app_state(
            provider_config("http://idp.test"),
            Arc::clone(&store) as Arc<dyn fleet_console_access::SessionStore>,
        );
        let router = crate::app::router(Arc::clone(&state));

        // Even with a session cookie present, the guard must not look it up
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/healthz")
                    .header(header::COOKIE, "session=some-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.gets(), 0);
    }

    #[tokio::test]
    async fn guarded_path_consults_the_session_store() {
        let store = Arc::new(CountingStore::new(MemorySessionStore::new()));
        let state = app_state(
            provider_config("http://idp.test"),
            Arc::clone(&store) as Arc<dyn fleet_console_access::SessionStore>,
        );
        let router = crate::app::router(Arc::clone(&state));

        let response = router
            .oneshot(request("GET", "/stats", Some("session=some-token")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.gets(), 1);
    }
}
