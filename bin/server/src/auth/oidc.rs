//! OAuth2 client for the federated identity provider.
//!
//! Drives the authorization-code flow against explicitly configured
//! endpoints: authorize redirect with PKCE and a CSRF state token, code
//! exchange at the token endpoint, then a userinfo fetch for the profile.
//! No email or domain allow-list is applied to the returned profile.

use std::time::Duration;

use fleet_console_access::{Identity, ProviderConfig};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
    basic::BasicClient,
};
use serde::Deserialize;

/// OAuth2 client for authenticating users against the identity provider.
pub struct OidcClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

/// State stored in the pre-auth cookie between begin and callback.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthState {
    /// CSRF state token; compared verbatim against the callback's `state`.
    pub csrf_token: String,
    /// PKCE code verifier for the token exchange.
    pub pkce_verifier: String,
}

/// Profile returned by the provider's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Subject claim; the stable id of the federated identity.
    pub sub: String,
    /// Email address, if released by the provider.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Fallback display name used by some providers.
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub picture: Option<String>,
}

impl UserProfile {
    /// Converts the profile into a `user`-role identity.
    #[must_use]
    pub fn into_identity(self) -> Identity {
        let display_name = self.name.or(self.preferred_username);
        Identity::federated(self.sub)
            .with_email(self.email)
            .with_display_name(display_name)
            .with_avatar_url(self.picture)
    }
}

impl OidcClient {
    /// Creates a new client, validating the configured endpoint URLs.
    pub fn new(config: ProviderConfig) -> Result<Self, OidcError> {
        let _ = AuthUrl::new(config.auth_url().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid auth URL: {}", e)))?;
        let _ = TokenUrl::new(config.token_url().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid token URL: {}", e)))?;
        let _ = RedirectUrl::new(config.redirect_uri().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid redirect URI: {}", e)))?;

        // One shared client with a bounded timeout; a hung provider must not
        // pin request workers indefinitely.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()
            .map_err(|e| {
                OidcError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, http })
    }

    /// Generates the authorization URL for redirecting the user.
    ///
    /// Returns the URL along with the state to stash in the pre-auth cookie.
    pub fn authorization_url(&self) -> (String, AuthState) {
        let client = BasicClient::new(ClientId::new(self.config.client_id().to_string()))
            .set_client_secret(ClientSecret::new(self.config.client_secret().to_string()))
            .set_auth_uri(
                AuthUrl::new(self.config.auth_url().to_string()).expect("valid auth URL"),
            )
            .set_redirect_uri(
                RedirectUrl::new(self.config.redirect_uri().to_string())
                    .expect("valid redirect URL"),
            );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge);

        for scope in self.config.scopes() {
            auth_request = auth_request.add_scope(Scope::new(scope.to_string()));
        }

        let (auth_url, csrf_token) = auth_request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };

        (auth_url.to_string(), state)
    }

    /// Exchanges the authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<String, OidcError> {
        let client = BasicClient::new(ClientId::new(self.config.client_id().to_string()))
            .set_client_secret(ClientSecret::new(self.config.client_secret().to_string()))
            .set_token_uri(
                TokenUrl::new(self.config.token_url().to_string()).expect("valid token URL"),
            )
            .set_redirect_uri(
                RedirectUrl::new(self.config.redirect_uri().to_string())
                    .expect("valid redirect URL"),
            );

        let pkce_verifier = PkceCodeVerifier::new(pkce_verifier.to_string());

        let token_response = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&self.http)
            .await
            .map_err(|e| OidcError::TokenExchange(format!("token exchange failed: {}", e)))?;

        Ok(token_response.access_token().secret().clone())
    }

    /// Fetches the user profile from the userinfo endpoint.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, OidcError> {
        let response = self
            .http
            .get(self.config.userinfo_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OidcError::ProfileFetch(format!("userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(OidcError::ProfileFetch(format!(
                "userinfo returned {}",
                response.status()
            )));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| OidcError::ProfileFetch(format!("malformed userinfo response: {}", e)))
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Identity provider errors.
#[derive(Debug)]
pub enum OidcError {
    /// Configuration error (invalid URLs, etc.)
    Configuration(String),
    /// Token exchange failed.
    TokenExchange(String),
    /// Userinfo fetch failed.
    ProfileFetch(String),
}

impl std::fmt::Display for OidcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "provider configuration error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "provider token exchange error: {}", msg),
            Self::ProfileFetch(msg) => write!(f, "provider profile fetch error: {}", msg),
        }
    }
}

impl std::error::Error for OidcError {}
