//! Logging and metrics setup for the binaries.

use metrics::describe_counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "cinereservas=info,cinereservas_server=info,tower_http=debug";

/// Install the global tracing subscriber (`RUST_LOG` aware, fmt output).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Start the Prometheus exporter on `addr` and describe the counters.
///
/// Must run inside a tokio runtime.
///
/// # Errors
///
/// Returns [`BuildError`] if the listener cannot be set up or a recorder is
/// already installed.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    register_metrics();
    tracing::info!(%addr, "Metrics exporter listening at http://{addr}/metrics");
    Ok(())
}

fn register_metrics() {
    describe_counter!("store.actions", "Actions sent to the reservation store");
    describe_counter!("store.effects", "Effects spawned by the reservation store");
    describe_counter!("bookings.created", "Bookings created, one per seat");
    describe_counter!("bookings.cancelled", "Bookings cancelled, directly or with their showing");
}
