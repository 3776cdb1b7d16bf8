//! # CineReservas
//!
//! Seat and booking coordination for a cinema.
//!
//! The [`ReservationState`] holds the catalog (movies, rooms, seats,
//! customers), the scheduled showings ("billboards"), the booking history and
//! the kiosk session. Every change goes through the [`ReservationReducer`] as
//! a [`ReservationAction`]; loading the catalog and persisting bookings are
//! effects, so the rules themselves stay synchronous and deterministic.
//!
//! ```ignore
//! let store = ReservationStore::new(
//!     ReservationState::new(),
//!     ReservationReducer::new(),
//!     ReservationEnvironment::in_memory(),
//! );
//!
//! store.send(ReservationAction::LoadCatalog).await?.wait().await?;
//! store.send(ReservationAction::LoadBillboards { date }).await?;
//! ```

pub mod actions;
pub mod catalog;
pub mod environment;
pub mod error;
pub mod queries;
pub mod reducer;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod types;

pub use actions::ReservationAction;
pub use catalog::{CatalogSnapshot, CatalogSource, MockCatalog};
pub use environment::ReservationEnvironment;
pub use error::ReservationError;
pub use queries::{BookingFilter, SeatAvailability, SelectionView, StatusFilter};
pub use reducer::ReservationReducer;
pub use state::{Created, ReservationState};
pub use storage::{BookingStorage, InMemoryBookingStorage, JsonFileStorage, StorageError};
pub use types::*;

/// Store running the reservation reducer
pub type ReservationStore = cinereservas_core::store::Store<
    ReservationState,
    ReservationAction,
    ReservationEnvironment,
    ReservationReducer,
>;
