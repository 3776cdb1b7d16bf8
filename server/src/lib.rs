//! # CineReservas Server
//!
//! Axum HTTP API over the reservation store.
//!
//! ```ignore
//! let store = ReservationStore::new(ReservationState::new(), ReservationReducer::new(), env);
//! cinereservas_server::bootstrap(&store).await?;
//! let app = build_router(AppState::new(store), "*");
//! axum::serve(listener, app).await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod server;
pub mod telemetry;

pub use config::Config;
pub use error::AppError;
pub use server::{build_router, AppState};

use cinereservas::{ReservationAction, ReservationStore};
use cinereservas_core::store::StoreError;

/// Load the catalog, then restore the booking history, waiting for each.
///
/// Bookings are restored after the catalog so their seats can be marked
/// occupied.
///
/// # Errors
///
/// Returns [`StoreError`] if the store is shutting down or an effect task fails.
pub async fn bootstrap(store: &ReservationStore) -> Result<(), StoreError> {
    for action in [ReservationAction::LoadCatalog, ReservationAction::RestoreBookings] {
        store.send(action).await?.wait().await?;
    }

    let (movies, rooms, seats, bookings) = store
        .state(|s| (s.movies.len(), s.rooms.len(), s.seats.len(), s.bookings.len()))
        .await;
    tracing::info!(movies, rooms, seats, bookings, "Reservation state ready");
    Ok(())
}
