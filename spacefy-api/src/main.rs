use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use spacefy_api::{app, AppState};
use spacefy_store::{app_config::Config, InMemoryBookingRepository, InMemoryListingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spacefy_api=debug,spacefy_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        "Starting Spacefy API on port {} with {} listing(s)",
        config.server.port,
        config.listings.len()
    );

    let listings = Arc::new(InMemoryListingRepository::with_listings(config.listings.clone()));
    let bookings = Arc::new(InMemoryBookingRepository::new());

    let mut app_state = AppState::new(
        listings,
        bookings,
        config.booking.policy(),
        config.booking.default_locale,
    );
    if let Some(minutes) = config.booking.session_ttl_minutes {
        app_state = app_state.with_session_ttl(chrono::Duration::minutes(i64::from(minutes)));
    }

    let sweeper = app_state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            sweeper.sweep_sessions().await;
        }
    });

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
