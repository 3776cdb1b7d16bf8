//! Every input to the [`ReservationReducer`](crate::reducer::ReservationReducer).

use crate::catalog::CatalogSnapshot;
use crate::types::{
    BillboardDraft, BillboardId, Booking, BookingId, Customer, CustomerDraft, CustomerId,
    MovieDraft, MovieId, RoomDraft, RoomId, SeatDraft, SeatId,
};
use chrono::NaiveDate;

/// Actions for the reservation state container
///
/// Commands are validated by the reducer. Events are fed back by effects
/// (catalog and storage I/O) and always apply.
#[derive(Clone, Debug)]
pub enum ReservationAction {
    // ========== Loading ==========
    /// Fetch movies, rooms, seats and customers from the catalog source
    LoadCatalog,

    /// Generate the default lineup for `date` unless it already has showings
    LoadBillboards {
        /// Day to schedule
        date: NaiveDate,
    },

    /// Fetch persisted bookings from storage
    RestoreBookings,

    // ========== Kiosk session ==========
    /// Pick a movie (or clear the pick); clears showing and seats
    SelectMovie {
        /// Movie to select
        movie_id: Option<MovieId>,
    },

    /// Pick a showing (or clear the pick); clears seats
    SelectBillboard {
        /// Showing to select
        billboard_id: Option<BillboardId>,
    },

    /// Add the seat to the selection, or remove it if already selected
    ToggleSeatSelection {
        /// Seat to toggle
        seat_id: SeatId,
    },

    /// Set or clear the customer at the kiosk
    SetCustomer {
        /// Customer to use for checkout
        customer: Option<Customer>,
    },

    /// Book the selected seats for the selected showing and current customer
    Checkout,

    // ========== Bookings ==========
    /// Book seats for a showing, all or nothing
    CreateBooking {
        /// Showing
        billboard_id: BillboardId,
        /// Seats, one booking each
        seat_ids: Vec<SeatId>,
        /// Who is booking
        customer_id: CustomerId,
    },

    /// Cancel one booking and free its seat
    CancelBooking {
        /// Booking to cancel
        booking_id: BookingId,
    },

    // ========== Movies ==========
    /// Add a movie
    CreateMovie {
        /// Movie fields
        draft: MovieDraft,
    },
    /// Replace a movie's fields
    UpdateMovie {
        /// Movie to change
        movie_id: MovieId,
        /// New fields
        draft: MovieDraft,
    },
    /// Soft-delete a movie
    DeleteMovie {
        /// Movie to delete
        movie_id: MovieId,
    },

    // ========== Rooms ==========
    /// Add a room
    CreateRoom {
        /// Room fields
        draft: RoomDraft,
    },
    /// Replace a room's fields
    UpdateRoom {
        /// Room to change
        room_id: RoomId,
        /// New fields
        draft: RoomDraft,
    },
    /// Soft-delete a room
    DeleteRoom {
        /// Room to delete
        room_id: RoomId,
    },

    // ========== Seats ==========
    /// Add a seat to a room
    CreateSeat {
        /// Seat fields
        draft: SeatDraft,
    },
    /// Move or re-number a seat
    UpdateSeat {
        /// Seat to change
        seat_id: SeatId,
        /// New fields
        draft: SeatDraft,
    },
    /// Remove a seat without active bookings
    DeleteSeat {
        /// Seat to remove
        seat_id: SeatId,
    },
    /// Enable or disable a seat
    SetSeatStatus {
        /// Seat to change
        seat_id: SeatId,
        /// `true` to make it available
        available: bool,
    },
    /// Flip a seat between available and occupied
    ToggleSeatStatus {
        /// Seat to flip
        seat_id: SeatId,
    },

    // ========== Billboards ==========
    /// Schedule a showing
    ScheduleBillboard {
        /// Showing fields
        draft: BillboardDraft,
    },
    /// Reschedule a showing
    UpdateBillboard {
        /// Showing to change
        billboard_id: BillboardId,
        /// New fields
        draft: BillboardDraft,
    },
    /// Soft-delete a showing without active bookings
    DeleteBillboard {
        /// Showing to delete
        billboard_id: BillboardId,
    },
    /// Cancel a showing together with all of its bookings
    CancelBillboard {
        /// Showing to cancel
        billboard_id: BillboardId,
    },

    // ========== Customers ==========
    /// Register a customer
    RegisterCustomer {
        /// Customer fields
        draft: CustomerDraft,
    },
    /// Replace a customer's fields
    UpdateCustomer {
        /// Customer to change
        customer_id: CustomerId,
        /// New fields
        draft: CustomerDraft,
    },
    /// Soft-delete a customer
    DeleteCustomer {
        /// Customer to delete
        customer_id: CustomerId,
    },

    // ========== Events ==========
    /// Catalog source answered
    CatalogLoaded {
        /// Loaded data
        snapshot: CatalogSnapshot,
    },
    /// Catalog source failed
    CatalogLoadFailed {
        /// Error message
        error: String,
    },
    /// Storage answered
    BookingsRestored {
        /// Stored bookings
        bookings: Vec<Booking>,
    },
    /// Bookings were written
    BookingsPersisted {
        /// How many bookings were written
        count: usize,
    },
    /// Reading or writing bookings failed
    PersistenceFailed {
        /// Error message
        error: String,
    },
}

impl ReservationAction {
    /// Whether this action is an effect result rather than a command
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::CatalogLoaded { .. }
                | Self::CatalogLoadFailed { .. }
                | Self::BookingsRestored { .. }
                | Self::BookingsPersisted { .. }
                | Self::PersistenceFailed { .. }
        )
    }

    /// Short name for logs and metrics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LoadCatalog => "load_catalog",
            Self::LoadBillboards { .. } => "load_billboards",
            Self::RestoreBookings => "restore_bookings",
            Self::SelectMovie { .. } => "select_movie",
            Self::SelectBillboard { .. } => "select_billboard",
            Self::ToggleSeatSelection { .. } => "toggle_seat_selection",
            Self::SetCustomer { .. } => "set_customer",
            Self::Checkout => "checkout",
            Self::CreateBooking { .. } => "create_booking",
            Self::CancelBooking { .. } => "cancel_booking",
            Self::CreateMovie { .. } => "create_movie",
            Self::UpdateMovie { .. } => "update_movie",
            Self::DeleteMovie { .. } => "delete_movie",
            Self::CreateRoom { .. } => "create_room",
            Self::UpdateRoom { .. } => "update_room",
            Self::DeleteRoom { .. } => "delete_room",
            Self::CreateSeat { .. } => "create_seat",
            Self::UpdateSeat { .. } => "update_seat",
            Self::DeleteSeat { .. } => "delete_seat",
            Self::SetSeatStatus { .. } => "set_seat_status",
            Self::ToggleSeatStatus { .. } => "toggle_seat_status",
            Self::ScheduleBillboard { .. } => "schedule_billboard",
            Self::UpdateBillboard { .. } => "update_billboard",
            Self::DeleteBillboard { .. } => "delete_billboard",
            Self::CancelBillboard { .. } => "cancel_billboard",
            Self::RegisterCustomer { .. } => "register_customer",
            Self::UpdateCustomer { .. } => "update_customer",
            Self::DeleteCustomer { .. } => "delete_customer",
            Self::CatalogLoaded { .. } => "catalog_loaded",
            Self::CatalogLoadFailed { .. } => "catalog_load_failed",
            Self::BookingsRestored { .. } => "bookings_restored",
            Self::BookingsPersisted { .. } => "bookings_persisted",
            Self::PersistenceFailed { .. } => "persistence_failed",
        }
    }
}
