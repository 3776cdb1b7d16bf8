//! Showing administration, including cancellation of a whole showing.

use super::{persist_bookings, Handled};
use crate::environment::ReservationEnvironment;
use crate::error::ReservationError;
use crate::schedule;
use crate::state::{Created, ReservationState};
use crate::types::{Billboard, BillboardDraft, BillboardId, BookingId, CustomerId};
use cinereservas_core::{smallvec, SmallVec};
use std::collections::BTreeSet;

/// Resolve a draft into a showing with the given id.
fn build(
    state: &ReservationState,
    id: BillboardId,
    draft: &BillboardDraft,
) -> Result<Billboard, ReservationError> {
    let movie = state.movie(draft.movie_id)?;
    let room = state.room(draft.room_id)?;
    let end_time = draft
        .end_time
        .unwrap_or_else(|| schedule::end_time(draft.start_time, movie.length_minutes));

    if end_time == draft.start_time {
        return Err(ReservationError::BadRequest(
            "Showing end time must differ from its start time".to_string(),
        ));
    }

    Ok(Billboard {
        id,
        date: draft.date,
        start_time: draft.start_time,
        end_time,
        movie_id: movie.id,
        movie_name: movie.name.clone(),
        room_id: room.id,
        room_name: room.name.clone(),
        status: true,
    })
}

fn active_bookings(state: &ReservationState, id: BillboardId) -> Vec<BookingId> {
    state
        .bookings
        .values()
        .filter(|b| b.status && b.billboard_id == id)
        .map(|b| b.id)
        .collect()
}

pub(super) fn schedule(state: &mut ReservationState, draft: &BillboardDraft) -> Handled {
    let billboard = build(state, state.next_billboard_id(), draft)?;
    let id = billboard.id;
    tracing::info!(
        billboard = %id,
        date = %billboard.date,
        movie = %billboard.movie_name,
        room = %billboard.room_name,
        "Showing scheduled"
    );
    state.billboards.insert(id, billboard);
    state.last_created = Some(Created::Billboard(id));
    Ok(SmallVec::new())
}

pub(super) fn update(state: &mut ReservationState, id: BillboardId, draft: &BillboardDraft) -> Handled {
    let current_room = state.billboard(id)?.room_id;
    let billboard = build(state, id, draft)?;

    if billboard.room_id != current_room && !active_bookings(state, id).is_empty() {
        return Err(ReservationError::Conflict(format!(
            "Showing {id} has active bookings and cannot change room"
        )));
    }

    state.billboards.insert(id, billboard);
    Ok(SmallVec::new())
}

pub(super) fn delete(state: &mut ReservationState, id: BillboardId) -> Handled {
    state.billboard(id)?;
    if !active_bookings(state, id).is_empty() {
        return Err(ReservationError::Conflict(format!(
            "Showing {id} has active bookings; cancel it instead"
        )));
    }
    if let Some(billboard) = state.billboards.get_mut(&id) {
        billboard.status = false;
    }
    state.prune_selection();
    Ok(SmallVec::new())
}

pub(super) fn cancel(
    state: &mut ReservationState,
    env: &ReservationEnvironment,
    id: BillboardId,
) -> Handled {
    let date = state.billboard(id)?.date;
    let today = env.clock.today();
    if date < today {
        return Err(ReservationError::BadRequest(format!(
            "Showings dated before today ({today}) cannot be cancelled"
        )));
    }

    let cancelled = active_bookings(state, id);
    let mut affected: BTreeSet<CustomerId> = BTreeSet::new();
    for booking_id in &cancelled {
        let Some(booking) = state.bookings.get_mut(booking_id) else {
            continue;
        };
        booking.status = false;
        affected.insert(booking.customer_id);
        let seat_id = booking.seat_id;
        if !state.seat_has_active_booking(seat_id) {
            if let Some(seat) = state.seats.get_mut(&seat_id) {
                seat.status = true;
            }
        }
    }

    if let Some(billboard) = state.billboards.get_mut(&id) {
        billboard.status = false;
    }
    state.prune_selection();

    tracing::info!(
        billboard = %id,
        bookings = cancelled.len(),
        customers = affected.len(),
        "Showing cancelled"
    );
    for customer_id in &affected {
        match state.customers.get(customer_id) {
            Some(customer) => tracing::info!(
                billboard = %id,
                customer = %customer.full_name(),
                contact = %customer.contact(),
                "Customer affected by cancellation"
            ),
            None => tracing::info!(
                billboard = %id,
                customer = %customer_id,
                "Customer affected by cancellation"
            ),
        }
    }
    metrics::counter!("bookings.cancelled").increment(cancelled.len() as u64);

    if cancelled.is_empty() {
        return Ok(SmallVec::new());
    }
    Ok(smallvec![persist_bookings(state, env)])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::fixtures::{seeded_state, test_env};
    use super::super::ReservationReducer;
    use crate::actions::ReservationAction;
    use crate::environment::ReservationEnvironment;
    use crate::error::ReservationError;
    use crate::state::Created;
    use crate::types::{BillboardDraft, BillboardId, BookingId, CustomerId, MovieId, RoomId, SeatId};
    use chrono::{NaiveDate, NaiveTime};
    use cinereservas_testing::{assertions, test_date, FixedClock, ReducerTest};
    use std::sync::Arc;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn draft(movie: u32, room: u32, start: NaiveTime, end: Option<NaiveTime>) -> BillboardDraft {
        BillboardDraft {
            date: test_date(),
            start_time: start,
            end_time: end,
            movie_id: MovieId::new(movie),
            room_id: RoomId::new(room),
        }
    }

    fn book(billboard: u32, seat: u32, customer: u32) -> ReservationAction {
        ReservationAction::CreateBooking {
            billboard_id: BillboardId::new(billboard),
            seat_ids: vec![SeatId::new(seat)],
            customer_id: CustomerId::new(customer),
        }
    }

    #[test]
    fn schedule_derives_end_time_from_movie_length() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(ReservationAction::ScheduleBillboard {
                draft: draft(4, 3, at(23, 0), None),
            })
            .then_state(|state| {
                assert_eq!(state.last_created, Some(Created::Billboard(BillboardId::new(13))));
                let billboard = &state.billboards[&BillboardId::new(13)];
                assert_eq!(billboard.end_time, at(1, 20));
                assert_eq!(billboard.movie_name, "Superhéroes Unidos");
                assert_eq!(billboard.room_name, "Sala VIP");
            })
            .run();
    }

    #[test]
    fn schedule_rejects_inactive_movie_and_zero_length_showing() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([ReservationAction::DeleteMovie {
                movie_id: MovieId::new(2),
            }])
            .when_action(ReservationAction::ScheduleBillboard {
                draft: draft(2, 1, at(10, 0), None),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::NotFound { .. })));
                assert_eq!(state.billboards.len(), 12);
            })
            .run();

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(ReservationAction::ScheduleBillboard {
                draft: draft(1, 1, at(10, 0), Some(at(10, 0))),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::BadRequest(_))));
            })
            .run();
    }

    #[test]
    fn showings_with_bookings_cannot_change_room_or_be_deleted() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([book(1, 3, 1)])
            .when_action(ReservationAction::UpdateBillboard {
                billboard_id: BillboardId::new(1),
                draft: draft(1, 2, at(12, 0), None),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::Conflict(_))));
                assert_eq!(state.billboards[&BillboardId::new(1)].room_id, RoomId::new(1));
            })
            .run();

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([book(1, 3, 1)])
            .when_action(ReservationAction::DeleteBillboard {
                billboard_id: BillboardId::new(1),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::Conflict(_))));
            })
            .run();
    }

    #[test]
    fn cancel_billboard_cancels_its_bookings_and_frees_seats() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([book(1, 1, 1), book(1, 2, 2), book(4, 3, 3)])
            .when_action(ReservationAction::CancelBillboard {
                billboard_id: BillboardId::new(1),
            })
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert!(!state.billboards[&BillboardId::new(1)].status);
                assert!(!state.bookings[&BookingId::new(1)].status);
                assert!(!state.bookings[&BookingId::new(2)].status);
                assert!(state.bookings[&BookingId::new(3)].status);
                assert!(state.seats[&SeatId::new(1)].status);
                assert!(state.seats[&SeatId::new(2)].status);
                assert!(!state.seats[&SeatId::new(3)].status);
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn past_showings_cannot_be_cancelled() {
        let tomorrow = FixedClock::on_date(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        let env = ReservationEnvironment {
            clock: Arc::new(tomorrow),
            ..test_env()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(env)
            .given_state(seeded_state())
            .when_action(ReservationAction::CancelBillboard {
                billboard_id: BillboardId::new(1),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::BadRequest(_))));
                assert!(state.billboards[&BillboardId::new(1)].status);
            })
            .run();
    }

    #[test]
    fn cancelling_an_inactive_showing_is_not_found() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([ReservationAction::CancelBillboard {
                billboard_id: BillboardId::new(2),
            }])
            .when_action(ReservationAction::CancelBillboard {
                billboard_id: BillboardId::new(2),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::NotFound { .. })));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }
}
