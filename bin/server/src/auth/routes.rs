//! Login, callback, and logout routes.
//!
//! Both login flows end the same way: the session lifecycle establishes a
//! session and the caller is redirected into the guarded application. Every
//! failure is surfaced as a redirect to the login page with a flash
//! message; raw error bodies never reach the caller.

use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use fleet_console_access::{SessionStoreError, SessionToken};
use serde::Deserialize;
use time::Duration as TimeDuration;

use super::AppState;
use super::middleware::{LOGIN_PATH, SESSION_COOKIE};
use super::oidc::AuthState;

/// Pre-auth state cookie name (CSRF protection during the federated flow).
const AUTH_STATE_COOKIE: &str = "auth_state";

/// Flash cookie name, read and cleared by the login page.
const FLASH_COOKIE: &str = "flash";

/// Lifetime of the pre-auth state cookie. An abandoned flow leaves nothing
/// behind but this cookie, and it expires on its own.
const AUTH_STATE_TTL_MINUTES: i64 = 10;

/// Query parameters for the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

/// Form body for the local admin login.
#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    username: String,
    password: String,
}

/// Renders the login page, or sends an already-authenticated caller home.
///
/// `/login` is a public path, so the guard attaches no identity here; the
/// handler resolves the session itself to break the redirect loop an
/// authenticated visit would otherwise cause.
pub async fn login_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = SessionToken::from(cookie.value());
        match state.sessions.resolve(&token).await {
            Ok(Some(_)) => return Redirect::to("/").into_response(),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "session store unavailable on login page");
            }
        }
    }

    let flash = jar.get(FLASH_COOKIE).map(|cookie| flash_text(cookie.value()));
    let clear_flash = remove_cookie(FLASH_COOKIE, LOGIN_PATH);

    (jar.add(clear_flash), Html(login_page(flash))).into_response()
}

/// Begins the federated flow: stash the CSRF state token and PKCE verifier
/// in the pre-auth cookie and bounce to the provider.
pub async fn login(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (auth_url, auth_state) = state.oidc_client.authorization_url();

    let cookie = Cookie::build((AUTH_STATE_COOKIE, encode_auth_state(&auth_state)))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(AUTH_STATE_TTL_MINUTES));

    (jar.add(cookie), Redirect::to(&auth_url))
}

/// Completes the federated flow.
///
/// The stored state token is good for exactly one callback: the pre-auth
/// cookie is cleared on every outcome, including rejection.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthError> {
    let auth_state_cookie = jar
        .get(AUTH_STATE_COOKIE)
        .ok_or(AuthError::MissingAuthState)?;

    let auth_state =
        decode_auth_state(auth_state_cookie.value()).ok_or(AuthError::InvalidAuthState)?;

    // Verbatim comparison against the token issued at begin
    if query.state != auth_state.csrf_token {
        return Err(AuthError::StateMismatch);
    }

    let access_token = state
        .oidc_client
        .exchange_code(&query.code, &auth_state.pkce_verifier)
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let profile = state
        .oidc_client
        .fetch_profile(&access_token)
        .await
        .map_err(|e| AuthError::ProfileFetch(e.to_string()))?;

    let identity = profile.into_identity();
    tracing::info!(subject = identity.id(), "federated login succeeded");

    let token = state
        .sessions
        .create(identity)
        .await
        .map_err(AuthError::Session)?;

    let jar = jar
        .add(session_cookie(&token, &state))
        .add(remove_cookie(AUTH_STATE_COOKIE, "/"));

    Ok((jar, Redirect::to("/")))
}

/// Local administrator login.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Result<impl IntoResponse, AuthError> {
    let identity = state
        .admin
        .authenticate(&form.username, &form.password)
        .map_err(|_| AuthError::InvalidCredentials)?;

    // First use of the operator account registers it with the externally
    // owned allow-list; a failure there must not block the login.
    if let Err(e) = state.allow_list.ensure(&form.username).await {
        tracing::warn!(error = %e, "operator allow-list update failed");
    }

    tracing::info!("local administrator login succeeded");

    let token = state
        .sessions
        .create(identity)
        .await
        .map_err(AuthError::Session)?;

    Ok((jar.add(session_cookie(&token, &state)), Redirect::to("/")))
}

/// Destroys the session and returns the caller to the login page.
///
/// Destroying an absent or already-destroyed session is a no-op.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = SessionToken::from(cookie.value());
        if let Err(e) = state.sessions.destroy(&token).await {
            tracing::warn!(error = %e, "failed to destroy session on logout");
        }
    }

    (
        jar.add(remove_cookie(SESSION_COOKIE, "/")),
        Redirect::to(LOGIN_PATH),
    )
}

/// Builds the session cookie for a freshly created session.
fn session_cookie(token: &SessionToken, state: &AppState) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(state.session_config.duration_minutes))
        .build()
}

/// Builds a removal cookie for the given name and path.
fn remove_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path(path)
        .max_age(TimeDuration::ZERO)
        .build()
}

/// Encodes the pre-auth state as a cookie-safe base64url JSON payload.
fn encode_auth_state(auth_state: &AuthState) -> String {
    let json = serde_json::to_string(auth_state).expect("serialize auth state");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
}

/// Decodes the pre-auth state cookie; `None` if tampered or truncated.
fn decode_auth_state(value: &str) -> Option<AuthState> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(value)
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Renders the login page with federated and local tabs.
fn login_page(flash: Option<&'static str>) -> String {
    let flash_region = match flash {
        Some(message) => format!(r#"<p class="flash" role="alert">{message}</p>"#),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1"/>
    <title>Log in | Fleet Console</title>
    <link rel="stylesheet" href="/assets/console.css"/>
  </head>
  <body>
    <main class="login-page">
      <div class="login-box">
        <h1>Log in to Fleet Console</h1>
        {flash_region}
        <section class="login-tab" id="sso">
          <a href="/auth/login" rel="external" class="login-button">Log in with SSO</a>
        </section>
        <section class="login-tab" id="local">
          <form method="post" action="/auth/admin-login">
            <label>Username <input type="text" name="username" autocomplete="username"/></label>
            <label>Password <input type="password" name="password" autocomplete="current-password"/></label>
            <button type="submit">Log in as administrator</button>
          </form>
        </section>
      </div>
    </main>
  </body>
</html>
"#
    )
}

/// Maps a flash slug to the text shown on the login page.
fn flash_text(slug: &str) -> &'static str {
    match slug {
        "state-mismatch" => "Your login attempt expired or was invalid. Please try again.",
        "provider-error" => "The identity provider could not complete the login.",
        "invalid-credentials" => "Invalid username or password.",
        "session-error" => "Could not establish a session. Please try again.",
        _ => "Login failed. Please try again.",
    }
}

/// Authentication failures surfaced at the HTTP boundary.
///
/// Every variant resolves to a redirect back to the login page with a
/// flash message.
#[derive(Debug)]
pub enum AuthError {
    /// Callback arrived with no stored pre-auth state.
    MissingAuthState,
    /// Stored pre-auth state did not decode.
    InvalidAuthState,
    /// Callback `state` did not match the issued token.
    StateMismatch,
    /// Token exchange at the provider failed.
    TokenExchange(String),
    /// Userinfo fetch at the provider failed.
    ProfileFetch(String),
    /// Local administrator credentials were wrong.
    InvalidCredentials,
    /// The session store failed while establishing the session.
    Session(SessionStoreError),
}

impl AuthError {
    /// Short cookie-safe slug identifying the failure to the login page.
    fn flash_slug(&self) -> &'static str {
        match self {
            Self::MissingAuthState | Self::InvalidAuthState | Self::StateMismatch => {
                "state-mismatch"
            }
            Self::TokenExchange(_) | Self::ProfileFetch(_) => "provider-error",
            Self::InvalidCredentials => "invalid-credentials",
            Self::Session(_) => "session-error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAuthState => write!(f, "missing pre-auth state"),
            Self::InvalidAuthState => write!(f, "invalid pre-auth state"),
            Self::StateMismatch => write!(f, "state token mismatch"),
            Self::TokenExchange(msg) => write!(f, "token exchange failed: {}", msg),
            Self::ProfileFetch(msg) => write!(f, "profile fetch failed: {}", msg),
            Self::InvalidCredentials => write!(f, "invalid administrator credentials"),
            Self::Session(e) => write!(f, "session store failure: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            Self::StateMismatch => {
                tracing::warn!("rejected callback with mismatched state token");
            }
            Self::MissingAuthState | Self::InvalidAuthState => {
                tracing::warn!("rejected callback without usable pre-auth state");
            }
            Self::TokenExchange(msg) => tracing::error!(error = %msg, "token exchange failed"),
            Self::ProfileFetch(msg) => tracing::error!(error = %msg, "profile fetch failed"),
            Self::InvalidCredentials => tracing::warn!("rejected local administrator login"),
            Self::Session(e) => tracing::error!(error = %e, "session store failed during login"),
        }

        let flash = Cookie::build((FLASH_COOKIE, self.flash_slug()))
            .path(LOGIN_PATH)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::minutes(1))
            .build();
        // The state token is single use: clear it even on rejection
        let clear_state = remove_cookie(AUTH_STATE_COOKIE, "/");

        let mut response = Redirect::to(LOGIN_PATH).into_response();
        for cookie in [flash, clear_state] {
            if let Ok(value) = cookie.to_string().parse() {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}
