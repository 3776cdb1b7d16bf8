//! Shared state and environment for reducer tests.
//!
//! `seeded_state` holds the mock catalog plus the default lineup for the test
//! date: showing `n` (1..=12) plays movie `n` in room `(n-1) % 3 + 1`.

use super::loading;
use crate::catalog::MockCatalog;
use crate::environment::ReservationEnvironment;
use crate::state::ReservationState;
use crate::storage::InMemoryBookingStorage;
use crate::types::{BillboardId, Booking, BookingId, CustomerId, SeatId};
use cinereservas_testing::{test_clock, test_date};
use std::sync::Arc;

pub(crate) fn test_env() -> ReservationEnvironment {
    test_env_with_storage(InMemoryBookingStorage::new())
}

pub(crate) fn test_env_with_storage(storage: InMemoryBookingStorage) -> ReservationEnvironment {
    ReservationEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(MockCatalog::new()),
        Arc::new(storage),
    )
}

pub(crate) fn seeded_state() -> ReservationState {
    let mut state = ReservationState::new();
    loading::catalog_loaded(&mut state, MockCatalog::new().snapshot().clone());
    loading::load_billboards(&mut state, test_date());
    state
}

pub(crate) fn booking(id: u32, billboard: u32, seat: u32, status: bool) -> Booking {
    Booking {
        id: BookingId::new(id),
        date: test_date(),
        customer_id: CustomerId::new(1),
        customer_name: "Juan Pérez".to_string(),
        seat_id: SeatId::new(seat),
        seat_label: format!("S{seat}"),
        billboard_id: BillboardId::new(billboard),
        movie_name: "Aventuras Cósmicas".to_string(),
        room_name: "Sala Normal".to_string(),
        status,
    }
}
