use anyhow::Context;
use seatline_api::{app, AppState};
use seatline_core::BookingCoordinator;
use seatline_store::{app_config::Config, Storage};
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatline_api=debug,seatline_core=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Seatline API on port {}", config.server.port);

    let storage = Storage::open(&config.database).await?;

    // Booking events for SSE subscribers
    let (events, _) = tokio::sync::broadcast::channel(100);

    let coordinator = BookingCoordinator::new(
        storage.flights.clone(),
        storage.bookings.clone(),
        config.booking.policy(),
    );
    let app_state = AppState::new(coordinator, events);

    if config.booking.seed_on_startup {
        app_state.coordinator.seed_if_empty().await?;
    }

    let mut router = app(app_state);
    if let Some(dir) = &config.server.static_dir {
        tracing::info!("Serving static files from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
