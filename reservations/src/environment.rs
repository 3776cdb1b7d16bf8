//! Dependencies injected into the reservation reducer.

use crate::catalog::{CatalogSource, MockCatalog};
use crate::storage::{BookingStorage, InMemoryBookingStorage};
use cinereservas_core::environment::{Clock, SystemClock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Environment dependencies for the reservation reducer
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Clock for booking dates and cancellation checks
    pub clock: Arc<dyn Clock>,
    /// Where the catalog comes from
    pub catalog: Arc<dyn CatalogSource>,
    /// Where bookings are kept
    pub storage: Arc<dyn BookingStorage>,
    /// Booking snapshot counter
    pub(crate) revisions: Arc<AtomicU64>,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        catalog: Arc<dyn CatalogSource>,
        storage: Arc<dyn BookingStorage>,
    ) -> Self {
        Self {
            clock,
            catalog,
            storage,
            revisions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Revision for the next booking snapshot.
    ///
    /// Called while the store holds the state lock, so revisions follow the
    /// order in which the state changed.
    pub(crate) fn next_booking_revision(&self) -> u64 {
        self.revisions.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// System clock, the mock catalog and in-memory storage
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(MockCatalog::new()),
            Arc::new(InMemoryBookingStorage::new()),
        )
    }
}

impl std::fmt::Debug for ReservationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEnvironment")
            .field("today", &self.clock.today())
            .finish_non_exhaustive()
    }
}
