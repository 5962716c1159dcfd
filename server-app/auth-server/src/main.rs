use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use auth_api::{router, AppState};
use auth_core::{AuthConfig, SessionAuthenticator};
use auth_infrastructure::InMemoryUserStore;
use auth_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    auth_shared::telemetry::init_telemetry(env!("CARGO_PKG_NAME"));

    info!("Auth server starting...");

    // Load and validate configuration
    let config = AppConfig::load().inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // User store
    let store = Arc::new(InMemoryUserStore::new());
    if config.app.seed_demo_users {
        let created = store.seed_demo_users().await?;
        info!("Seeded {} demo users", created);
    }

    // Authenticator refuses weak secrets here, before the listener opens
    let auth = SessionAuthenticator::new(store.clone(), store, &AuthConfig::from(&config))?;
    info!(
        "Session lifetime {}s, refresh lifetime {}s",
        auth.base_lifetime_secs(),
        auth.base_lifetime_secs() * auth_shared::constants::REFRESH_LIFETIME_MULTIPLIER
    );

    let app = router(AppState::new(auth), &config.cors);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
