//! CineReservas HTTP server.
//!
//! Seat reservations for a cinema: catalog administration, showings, a kiosk
//! session and bookings persisted to a JSON file.

use cinereservas::{
    JsonFileStorage, MockCatalog, ReservationEnvironment, ReservationReducer, ReservationState,
    ReservationStore,
};
use cinereservas_core::environment::SystemClock;
use cinereservas_server::{bootstrap, build_router, telemetry, AppState, Config};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    info!("Starting CineReservas server");

    let config = Config::from_env()?;
    info!(
        bind = %config.bind_addr()?,
        bookings_path = %config.storage.bookings_path.display(),
        seed_catalog = config.storage.seed_catalog,
        "Configuration loaded"
    );

    if config.metrics.enabled {
        telemetry::init_metrics(config.metrics_addr()?)?;
    }

    let catalog = if config.storage.seed_catalog {
        MockCatalog::new()
    } else {
        MockCatalog::empty()
    };
    let environment = ReservationEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(catalog),
        Arc::new(JsonFileStorage::new(&config.storage.bookings_path)),
    );
    let store = ReservationStore::new(
        ReservationState::new(),
        ReservationReducer::new(),
        environment,
    );

    bootstrap(&store).await?;
    if let Some(problem) = store.state(|s| s.last_error.clone()).await {
        warn!(error = %problem, "Started with a degraded reservation state");
    }

    let app = build_router(AppState::new(store.clone()), &config.server.cors_allow_origin);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining effects");
    if let Err(e) = store.shutdown(config.server.shutdown_timeout).await {
        error!(error = %e, "Store shutdown incomplete");
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
