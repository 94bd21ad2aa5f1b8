use bus_tracker::config::AppConfig;
use bus_tracker::cta::CtaClient;
use bus_tracker::registry::SessionRegistry;
use bus_tracker::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bus_tracker=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let client = CtaClient::new(config.cta.clone()).expect("Failed to create CTA client");
    info!(base_url = %config.cta.base_url, "using bus tracker backend");

    if let Some(location) = config.location {
        info!(?location, "rider location overridden by configuration");
    }

    // Each page load opens its own session, which loads routes and the
    // rider's location as soon as it starts.
    let sessions = SessionRegistry::new(client, config.location);

    let state = AppState::new(sessions);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind");
    info!("Bus Tracker listening on http://{}", config.addr);

    axum::serve(listener, app).await.expect("Server error");
}
