//! Catalog administration: movies, rooms, seats and customers.

use super::Handled;
use crate::error::ReservationError;
use crate::state::{Created, ReservationState};
use crate::types::{
    CustomerDraft, CustomerId, MovieDraft, MovieId, RoomDraft, RoomId, Seat, SeatDraft, SeatId,
};
use cinereservas_core::SmallVec;

// ============================================================================
// Movies
// ============================================================================

pub(super) fn create_movie(state: &mut ReservationState, draft: MovieDraft) -> Handled {
    draft.validate()?;
    let id = state.next_movie_id();
    state.movies.insert(id, draft.into_movie(id));
    tracing::info!(movie = %id, "Movie created");
    state.last_created = Some(Created::Movie(id));
    Ok(SmallVec::new())
}

pub(super) fn update_movie(state: &mut ReservationState, id: MovieId, draft: MovieDraft) -> Handled {
    state.movie(id)?;
    draft.validate()?;
    let movie = draft.into_movie(id);
    for billboard in state.billboards.values_mut().filter(|b| b.movie_id == id) {
        billboard.movie_name.clone_from(&movie.name);
    }
    state.movies.insert(id, movie);
    Ok(SmallVec::new())
}

pub(super) fn delete_movie(state: &mut ReservationState, id: MovieId) -> Handled {
    state.movie(id)?;
    if let Some(movie) = state.movies.get_mut(&id) {
        movie.status = false;
    }
    state.prune_selection();
    tracing::info!(movie = %id, "Movie deleted");
    Ok(SmallVec::new())
}

// ============================================================================
// Rooms
// ============================================================================

fn check_room_number(
    state: &ReservationState,
    number: u16,
    except: Option<RoomId>,
) -> Result<(), ReservationError> {
    let taken = state
        .rooms
        .values()
        .any(|r| r.status && r.number == number && Some(r.id) != except);
    if taken {
        return Err(ReservationError::Conflict(format!(
            "Room number {number} is already in use"
        )));
    }
    Ok(())
}

pub(super) fn create_room(state: &mut ReservationState, draft: RoomDraft) -> Handled {
    draft.validate()?;
    check_room_number(state, draft.number, None)?;
    let id = state.next_room_id();
    state.rooms.insert(id, draft.into_room(id));
    tracing::info!(room = %id, "Room created");
    state.last_created = Some(Created::Room(id));
    Ok(SmallVec::new())
}

pub(super) fn update_room(state: &mut ReservationState, id: RoomId, draft: RoomDraft) -> Handled {
    state.room(id)?;
    draft.validate()?;
    check_room_number(state, draft.number, Some(id))?;
    let room = draft.into_room(id);
    for billboard in state.billboards.values_mut().filter(|b| b.room_id == id) {
        billboard.room_name.clone_from(&room.name);
    }
    state.rooms.insert(id, room);
    Ok(SmallVec::new())
}

pub(super) fn delete_room(state: &mut ReservationState, id: RoomId) -> Handled {
    state.room(id)?;
    if let Some(room) = state.rooms.get_mut(&id) {
        room.status = false;
    }
    tracing::info!(room = %id, "Room deleted");
    Ok(SmallVec::new())
}

// ============================================================================
// Seats
// ============================================================================

fn check_seat_position(
    state: &ReservationState,
    draft: &SeatDraft,
    except: Option<SeatId>,
) -> Result<(), ReservationError> {
    let taken = state.seats.values().any(|s| {
        s.room_id == draft.room_id
            && s.row_number == draft.row_number
            && s.number == draft.number
            && Some(s.id) != except
    });
    if taken {
        return Err(ReservationError::Conflict(format!(
            "Room {} already has a seat at row {} number {}",
            draft.room_id, draft.row_number, draft.number
        )));
    }
    Ok(())
}

fn booked_seat_conflict(seat: &Seat, what: &str) -> ReservationError {
    ReservationError::Conflict(format!(
        "Seat {} has an active booking and cannot be {what}",
        seat.label()
    ))
}

pub(super) fn create_seat(state: &mut ReservationState, draft: &SeatDraft) -> Handled {
    draft.validate()?;
    state.room(draft.room_id)?;
    check_seat_position(state, draft, None)?;

    let id = state.next_seat_id();
    state.seats.insert(
        id,
        Seat {
            id,
            number: draft.number,
            row_number: draft.row_number,
            room_id: draft.room_id,
            status: draft.status.unwrap_or(true),
        },
    );
    state.last_created = Some(Created::Seat(id));
    Ok(SmallVec::new())
}

pub(super) fn update_seat(state: &mut ReservationState, id: SeatId, draft: &SeatDraft) -> Handled {
    let seat = state.seat(id)?;
    draft.validate()?;
    state.room(draft.room_id)?;

    let moved = seat.room_id != draft.room_id
        || seat.row_number != draft.row_number
        || seat.number != draft.number;
    let booked = state.seat_has_active_booking(id);
    if booked && moved {
        return Err(booked_seat_conflict(seat, "moved"));
    }
    match draft.status {
        Some(true) if booked => return Err(booked_seat_conflict(seat, "re-enabled")),
        Some(false) if booked => return Err(booked_seat_conflict(seat, "disabled")),
        _ => {},
    }
    let status = draft.status.unwrap_or(seat.status);
    check_seat_position(state, draft, Some(id))?;

    state.seats.insert(
        id,
        Seat {
            id,
            number: draft.number,
            row_number: draft.row_number,
            room_id: draft.room_id,
            status,
        },
    );
    state.prune_selection();
    Ok(SmallVec::new())
}

pub(super) fn delete_seat(state: &mut ReservationState, id: SeatId) -> Handled {
    let seat = state.seat(id)?;
    if state.seat_has_active_booking(id) {
        return Err(booked_seat_conflict(seat, "deleted"));
    }
    state.seats.remove(&id);
    state.selected_seats.retain(|selected| *selected != id);
    Ok(SmallVec::new())
}

pub(super) fn set_seat_status(state: &mut ReservationState, id: SeatId, available: bool) -> Handled {
    let seat = state.seat(id)?;
    if state.seat_has_active_booking(id) {
        let what = if available { "re-enabled" } else { "disabled" };
        return Err(booked_seat_conflict(seat, what));
    }
    if let Some(seat) = state.seats.get_mut(&id) {
        seat.status = available;
    }
    if !available {
        state.selected_seats.retain(|selected| *selected != id);
    }
    tracing::debug!(seat = %id, available, "Seat status changed");
    Ok(SmallVec::new())
}

// ============================================================================
// Customers
// ============================================================================

fn check_customer_unique(
    state: &ReservationState,
    draft: &CustomerDraft,
    except: Option<CustomerId>,
) -> Result<(), ReservationError> {
    let document = draft.document_number.trim();
    let email = draft
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    for customer in state.customers.values() {
        if !customer.status || Some(customer.id) == except {
            continue;
        }
        if customer.document_number == document {
            return Err(ReservationError::Conflict(format!(
                "A customer with document {document} already exists"
            )));
        }
        if let (Some(email), Some(existing)) = (email, customer.email.as_deref()) {
            if existing.eq_ignore_ascii_case(email) {
                return Err(ReservationError::Conflict(format!(
                    "A customer with email {email} already exists"
                )));
            }
        }
    }
    Ok(())
}

pub(super) fn register_customer(state: &mut ReservationState, draft: CustomerDraft) -> Handled {
    draft.validate()?;
    check_customer_unique(state, &draft, None)?;
    let id = state.next_customer_id();
    state.customers.insert(id, draft.into_customer(id));
    tracing::info!(customer = %id, "Customer registered");
    state.last_created = Some(Created::Customer(id));
    Ok(SmallVec::new())
}

pub(super) fn update_customer(
    state: &mut ReservationState,
    id: CustomerId,
    draft: CustomerDraft,
) -> Handled {
    state.customer(id)?;
    draft.validate()?;
    check_customer_unique(state, &draft, Some(id))?;

    let customer = draft.into_customer(id);
    if state.current_customer.as_ref().is_some_and(|c| c.id == id) {
        state.current_customer = Some(customer.clone());
    }
    state.customers.insert(id, customer);
    Ok(SmallVec::new())
}

pub(super) fn delete_customer(state: &mut ReservationState, id: CustomerId) -> Handled {
    state.customer(id)?;
    if let Some(customer) = state.customers.get_mut(&id) {
        customer.status = false;
    }
    if state.current_customer.as_ref().is_some_and(|c| c.id == id) {
        state.current_customer = None;
    }
    tracing::info!(customer = %id, "Customer deleted");
    Ok(SmallVec::new())
}
