use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use fleet_console_access::{MemorySessionStore, NullAllowList, SessionManager, SessionStore};
use fleet_console_server::{
    app,
    auth::{AppState, OidcClient, PublicPaths},
    config::ServerConfig,
    pages,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    // Spawn periodic expired-session sweep
    let cleanup_store = Arc::clone(&store);
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            match cleanup_store.remove_expired().await {
                Ok(count) if count > 0 => {
                    tracing::debug!(removed_sessions = count, "Periodic session cleanup");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to sweep expired sessions");
                }
            }
        }
    });

    // Initialize the identity provider client
    let oidc_client =
        OidcClient::new(config.provider).expect("failed to build identity provider client");

    // Build the page registry; a duplicate path is a startup defect
    let registry = pages::default_registry().expect("failed to build page registry");

    let state = Arc::new(AppState {
        sessions: SessionManager::new(
            store,
            ChronoDuration::minutes(config.session.duration_minutes),
        ),
        oidc_client,
        admin: config.admin,
        allow_list: Arc::new(NullAllowList),
        session_config: config.session,
        pages: registry,
        public_paths: PublicPaths::with_extra(&config.public_paths),
    });

    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
