//! SPA shell and router assembly.
//!
//! The outer shell always answers 200; the content region carries the
//! resolved page, a logical not-found, or an access-denied notice, so the
//! client-side router keeps working across navigation without per-page
//! server routes.

use std::sync::Arc;

use axum::{
    Router, middleware,
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use fleet_console_access::Identity;
use tower_http::services::ServeDir;

use crate::auth::{self, AppState};
use crate::auth::middleware::{OptionalUser, route_guard};
use crate::pages::{PageContent, Resolution, escape_html};

/// Builds the gateway router: auth routes, health, static assets, and the
/// guarded SPA fallback.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes
        .route("/login", get(auth::login_form))
        .route("/auth/login", get(auth::login))
        .route("/auth/login/callback", get(auth::callback))
        .route("/auth/admin-login", post(auth::admin_login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/auth/logout", get(auth::logout).post(auth::logout))
        // Liveness
        .route("/healthz", get(healthz))
        // Static assets
        .nest_service("/assets", ServeDir::new("assets"))
        // Everything else is the guarded SPA shell
        .fallback(spa)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            route_guard,
        ))
        .with_state(state)
}

/// Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}

/// Guarded SPA fallback: resolve the path and render it inside the shell.
///
/// Resolution failures render inside the content region with status 200;
/// HTTP-level errors would break client-side navigation.
async fn spa(
    State(state): State<Arc<AppState>>,
    OptionalUser(identity): OptionalUser,
    uri: Uri,
) -> Response {
    let content = match state.pages.resolve(uri.path(), identity.as_ref()) {
        Resolution::Page(content) => content,
        Resolution::NotFound => not_found(uri.path()),
        Resolution::AccessDenied => access_denied(),
    };

    Html(shell(&content, identity.as_ref())).into_response()
}

/// Logical not-found render; the shell still answers 200.
fn not_found(path: &str) -> PageContent {
    PageContent {
        title: "Not found".to_string(),
        body: format!(
            r#"<section id="not-found">
  <h1>Page not found</h1>
  <p>No page is registered at {}.</p>
</section>"#,
            escape_html(path)
        ),
    }
}

/// In-page access-denied render for admin-restricted pages.
fn access_denied() -> PageContent {
    PageContent {
        title: "Access denied".to_string(),
        body: r#"<section id="access-denied">
  <h1>Access denied</h1>
  <p>This page requires administrator access.</p>
</section>"#
            .to_string(),
    }
}

/// Renders the SPA shell around the resolved content.
fn shell(content: &PageContent, identity: Option<&Identity>) -> String {
    let nav_session = match identity {
        Some(identity) => format!(
            r#"<span class="nav-user">{}</span> <a href="/logout" rel="external">Log out</a>"#,
            escape_html(identity.label())
        ),
        None => r#"<a href="/login" rel="external">Log in</a>"#.to_string(),
    };

    let admin_links = if identity.is_some_and(Identity::is_admin) {
        r#"<a href="/admin">Administration</a>
        <a href="/drivers/documents">Driver documents</a>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1"/>
    <title>{title} | Fleet Console</title>
    <link rel="stylesheet" href="/assets/console.css"/>
    <script type="module" src="/assets/console.js" defer></script>
  </head>
  <body>
    <nav class="console-nav">
      <a href="/trips">Trips</a>
      <a href="/stats">Stats</a>
      <a href="/map">Map</a>
      {admin_links}
      <span class="nav-session">{nav_session}</span>
    </nav>
    <main id="content">
{body}
    </main>
  </body>
</html>
"#,
        title = escape_html(&content.title),
        body = content.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{body_string, request, session_cookie_for, test_router};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthz_answers_ok() {
        let (router, _state) = test_router();

        let response = router
            .oneshot(request("GET", "/healthz", None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn root_and_trips_render_the_same_page() {
        let (router, state) = test_router();
        let cookie = session_cookie_for(&state, false).await;

        let root = router
            .clone()
            .oneshot(request("GET", "/", Some(&cookie)))
            .await
            .expect("response");
        let trips = router
            .oneshot(request("GET", "/trips", Some(&cookie)))
            .await
            .expect("response");

        assert_eq!(root.status(), StatusCode::OK);
        assert_eq!(trips.status(), StatusCode::OK);
        assert_eq!(body_string(root).await, body_string(trips).await);
    }

    #[tokio::test]
    async fn unregistered_path_renders_not_found_with_status_200() {
        let (router, state) = test_router();
        let cookie = session_cookie_for(&state, false).await;

        let response = router
            .oneshot(request("GET", "/does-not-exist", Some(&cookie)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn user_role_gets_access_denied_render_on_admin_page() {
        let (router, state) = test_router();
        let cookie = session_cookie_for(&state, false).await;

        let response = router
            .oneshot(request("GET", "/admin", Some(&cookie)))
            .await
            .expect("response");

        // In-page denial, not an HTTP failure
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Access denied"));
        assert!(!body.contains(r#"data-page="admin""#));
    }

    #[tokio::test]
    async fn admin_role_sees_the_admin_page_and_nav_links() {
        let (router, state) = test_router();
        let cookie = session_cookie_for(&state, true).await;

        let response = router
            .oneshot(request("GET", "/admin", Some(&cookie)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"data-page="admin""#));
        assert!(body.contains("/drivers/documents"));
    }

    #[tokio::test]
    async fn user_role_nav_hides_admin_links() {
        let (router, state) = test_router();
        let cookie = session_cookie_for(&state, false).await;

        let response = router
            .oneshot(request("GET", "/trips", Some(&cookie)))
            .await
            .expect("response");

        let body = body_string(response).await;
        assert!(!body.contains("/drivers/documents"));
        assert!(body.contains("user@example.com"));
    }
}
