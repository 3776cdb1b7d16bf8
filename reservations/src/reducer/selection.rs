//! Kiosk session: the shared movie, showing, seat and customer selection.

use super::{bookings, Effects, Handled};
use crate::environment::ReservationEnvironment;
use crate::error::ReservationError;
use crate::state::ReservationState;
use crate::types::{BillboardId, Customer, MovieId, SeatId};
use cinereservas_core::SmallVec;

pub(super) fn select_movie(state: &mut ReservationState, movie_id: Option<MovieId>) -> Handled {
    if let Some(id) = movie_id {
        state.movie(id)?;
    }
    state.selected_movie = movie_id;
    state.selected_billboard = None;
    state.selected_seats.clear();
    Ok(SmallVec::new())
}

pub(super) fn select_billboard(
    state: &mut ReservationState,
    billboard_id: Option<BillboardId>,
) -> Handled {
    if let Some(id) = billboard_id {
        state.billboard(id)?;
    }
    state.selected_billboard = billboard_id;
    state.selected_seats.clear();
    Ok(SmallVec::new())
}

pub(super) fn toggle_seat(state: &mut ReservationState, seat_id: SeatId) -> Handled {
    if let Some(position) = state.selected_seats.iter().position(|id| *id == seat_id) {
        state.selected_seats.remove(position);
        return Ok(SmallVec::new());
    }

    let seat = state.seat(seat_id)?;
    if !seat.status {
        return Err(ReservationError::Conflict(format!(
            "Seat {} is not available",
            seat.label()
        )));
    }
    if let Some(billboard_id) = state.selected_billboard {
        let billboard = state.billboard(billboard_id)?;
        if seat.room_id != billboard.room_id {
            return Err(ReservationError::BadRequest(format!(
                "Seat {} is not in {}",
                seat.label(),
                billboard.room_name
            )));
        }
    }

    state.selected_seats.push(seat_id);
    Ok(SmallVec::new())
}

pub(super) fn set_customer(state: &mut ReservationState, customer: Option<Customer>) -> Effects {
    state.current_customer = customer;
    SmallVec::new()
}

pub(super) fn checkout(state: &mut ReservationState, env: &ReservationEnvironment) -> Handled {
    let billboard_id = state
        .selected_billboard
        .ok_or_else(|| ReservationError::BadRequest("No showing selected".to_string()))?;
    let customer_id = state
        .current_customer
        .as_ref()
        .map(|c| c.id)
        .ok_or_else(|| ReservationError::BadRequest("No customer set".to_string()))?;
    let seat_ids = state.selected_seats.clone();

    bookings::create_booking(state, env, billboard_id, &seat_ids, customer_id)
}
