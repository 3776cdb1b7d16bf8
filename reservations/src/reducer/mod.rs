//! The reservation reducer.
//!
//! Every command is validated against the current state before anything is
//! mutated. A rejected command only records `last_error`; an accepted one
//! clears it. Catalog and storage I/O are returned as effects whose results
//! come back as events.

use crate::actions::ReservationAction;
use crate::environment::ReservationEnvironment;
use crate::error::ReservationError;
use crate::state::ReservationState;
use cinereservas_core::{effect::Effect, reducer::Reducer, SmallVec};

mod admin;
mod billboards;
mod bookings;
mod loading;
mod selection;

#[cfg(test)]
pub(crate) mod fixtures;

/// Effects returned by one reduction
pub(crate) type Effects = SmallVec<[Effect<ReservationAction>; 4]>;

/// Outcome of a command handler
pub(crate) type Handled = Result<Effects, ReservationError>;

/// Reducer for the reservation state container
#[derive(Clone, Debug, Default)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates a new `ReservationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn handle(
        state: &mut ReservationState,
        action: ReservationAction,
        env: &ReservationEnvironment,
    ) -> Handled {
        use ReservationAction as A;

        match action {
            A::LoadCatalog => Ok(loading::load_catalog(env)),
            A::LoadBillboards { date } => Ok(loading::load_billboards(state, date)),
            A::RestoreBookings => Ok(loading::restore_bookings(env)),

            A::SelectMovie { movie_id } => selection::select_movie(state, movie_id),
            A::SelectBillboard { billboard_id } => selection::select_billboard(state, billboard_id),
            A::ToggleSeatSelection { seat_id } => selection::toggle_seat(state, seat_id),
            A::SetCustomer { customer } => Ok(selection::set_customer(state, customer)),
            A::Checkout => selection::checkout(state, env),

            A::CreateBooking {
                billboard_id,
                seat_ids,
                customer_id,
            } => bookings::create_booking(state, env, billboard_id, &seat_ids, customer_id),
            A::CancelBooking { booking_id } => bookings::cancel_booking(state, env, booking_id),

            A::CreateMovie { draft } => admin::create_movie(state, draft),
            A::UpdateMovie { movie_id, draft } => admin::update_movie(state, movie_id, draft),
            A::DeleteMovie { movie_id } => admin::delete_movie(state, movie_id),
            A::CreateRoom { draft } => admin::create_room(state, draft),
            A::UpdateRoom { room_id, draft } => admin::update_room(state, room_id, draft),
            A::DeleteRoom { room_id } => admin::delete_room(state, room_id),
            A::CreateSeat { draft } => admin::create_seat(state, &draft),
            A::UpdateSeat { seat_id, draft } => admin::update_seat(state, seat_id, &draft),
            A::DeleteSeat { seat_id } => admin::delete_seat(state, seat_id),
            A::SetSeatStatus { seat_id, available } => {
                admin::set_seat_status(state, seat_id, available)
            },
            A::ToggleSeatStatus { seat_id } => {
                let available = !state.seat(seat_id)?.status;
                admin::set_seat_status(state, seat_id, available)
            },
            A::RegisterCustomer { draft } => admin::register_customer(state, draft),
            A::UpdateCustomer { customer_id, draft } => {
                admin::update_customer(state, customer_id, draft)
            },
            A::DeleteCustomer { customer_id } => admin::delete_customer(state, customer_id),

            A::ScheduleBillboard { draft } => billboards::schedule(state, &draft),
            A::UpdateBillboard {
                billboard_id,
                draft,
            } => billboards::update(state, billboard_id, &draft),
            A::DeleteBillboard { billboard_id } => billboards::delete(state, billboard_id),
            A::CancelBillboard { billboard_id } => billboards::cancel(state, env, billboard_id),

            A::CatalogLoaded { snapshot } => Ok(loading::catalog_loaded(state, snapshot)),
            A::CatalogLoadFailed { error } => Ok(loading::catalog_load_failed(state, error)),
            A::BookingsRestored { bookings } => Ok(loading::bookings_restored(state, bookings)),
            A::BookingsPersisted { count } => {
                tracing::debug!(count, "Bookings persisted");
                Ok(SmallVec::new())
            },
            A::PersistenceFailed { error } => Ok(loading::persistence_failed(state, error)),
        }
    }
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let name = action.name();

        if action.is_event() {
            return Self::handle(state, action, env).unwrap_or_default();
        }

        let previously_created = state.last_created.take();

        match Self::handle(state, action, env) {
            Ok(effects) => {
                tracing::debug!(action = name, effects = effects.len(), "Command accepted");
                state.last_error = None;
                effects
            },
            Err(error) => {
                tracing::warn!(action = name, error = %error, "Command rejected");
                state.last_created = previously_created;
                state.last_error = Some(error);
                SmallVec::new()
            },
        }
    }
}

/// Effect that writes the whole booking list to storage
pub(crate) fn persist_bookings(
    state: &ReservationState,
    env: &ReservationEnvironment,
) -> Effect<ReservationAction> {
    let bookings: Vec<_> = state.bookings.values().cloned().collect();
    let revision = env.next_booking_revision();
    let storage = env.storage.clone();

    Effect::future(async move {
        let count = bookings.len();
        match storage.save(revision, bookings).await {
            Ok(()) => Some(ReservationAction::BookingsPersisted { count }),
            Err(error) => Some(ReservationAction::PersistenceFailed {
                error: error.to_string(),
            }),
        }
    })
}
