//! Booking creation and cancellation.

use super::{persist_bookings, Handled};
use crate::environment::ReservationEnvironment;
use crate::error::ReservationError;
use crate::state::{Created, ReservationState};
use crate::types::{Billboard, Booking, BookingId, Customer, CustomerId, Seat, SeatId};
use cinereservas_core::smallvec;
use std::collections::HashSet;

/// Every check `create_booking` performs, in order. Nothing is mutated here.
fn validate_booking<'a>(
    state: &'a ReservationState,
    billboard_id: crate::types::BillboardId,
    seat_ids: &[SeatId],
    customer_id: CustomerId,
) -> Result<(&'a Billboard, Customer, Vec<&'a Seat>), ReservationError> {
    let billboard = state.billboard(billboard_id)?;

    if seat_ids.is_empty() {
        return Err(ReservationError::BadRequest(
            "At least one seat must be selected".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = seat_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(ReservationError::BadRequest(format!(
            "Seat {duplicate} requested more than once"
        )));
    }

    let customer = match state.customer(customer_id) {
        Ok(customer) => customer.clone(),
        Err(error) => state
            .current_customer
            .as_ref()
            .filter(|c| c.id == customer_id)
            .cloned()
            .ok_or(error)?,
    };

    let mut seats = Vec::with_capacity(seat_ids.len());
    for &seat_id in seat_ids {
        let seat = state.seat(seat_id)?;
        if seat.room_id != billboard.room_id {
            return Err(ReservationError::BadRequest(format!(
                "Seat {} is not in {}",
                seat.label(),
                billboard.room_name
            )));
        }
        if !seat.status {
            return Err(ReservationError::Conflict(format!(
                "Seat {} is not available",
                seat.label()
            )));
        }
        if state.active_booking_for(billboard.id, seat_id).is_some() {
            return Err(ReservationError::Conflict(format!(
                "Seat {} is already booked for this showing",
                seat.label()
            )));
        }
        seats.push(seat);
    }

    Ok((billboard, customer, seats))
}

pub(super) fn create_booking(
    state: &mut ReservationState,
    env: &ReservationEnvironment,
    billboard_id: crate::types::BillboardId,
    seat_ids: &[SeatId],
    customer_id: CustomerId,
) -> Handled {
    let (billboard, customer, seats) = validate_booking(state, billboard_id, seat_ids, customer_id)?;

    let today = env.clock.today();
    let customer_name = customer.full_name();
    let mut next_id = state.next_booking_id();
    let bookings: Vec<Booking> = seats
        .iter()
        .map(|seat| {
            let booking = Booking {
                id: next_id,
                date: today,
                customer_id: customer.id,
                customer_name: customer_name.clone(),
                seat_id: seat.id,
                seat_label: seat.label(),
                billboard_id: billboard.id,
                movie_name: billboard.movie_name.clone(),
                room_name: billboard.room_name.clone(),
                status: true,
            };
            next_id = next_id.next();
            booking
        })
        .collect();

    let ids: Vec<BookingId> = bookings.iter().map(|b| b.id).collect();
    for booking in bookings {
        if let Some(seat) = state.seats.get_mut(&booking.seat_id) {
            seat.status = false;
        }
        state.bookings.insert(booking.id, booking);
    }
    state.selected_seats.retain(|id| !seat_ids.contains(id));

    tracing::info!(
        billboard = %billboard_id,
        customer = %customer_id,
        seats = ids.len(),
        "Bookings created"
    );
    metrics::counter!("bookings.created").increment(ids.len() as u64);

    state.last_created = Some(Created::Bookings(ids));
    Ok(smallvec![persist_bookings(state, env)])
}

pub(super) fn cancel_booking(
    state: &mut ReservationState,
    env: &ReservationEnvironment,
    booking_id: BookingId,
) -> Handled {
    let seat_id = state
        .bookings
        .get(&booking_id)
        .filter(|b| b.status)
        .map(|b| b.seat_id)
        .ok_or_else(|| ReservationError::not_found("Booking", booking_id))?;

    if let Some(booking) = state.bookings.get_mut(&booking_id) {
        booking.status = false;
    }
    if !state.seat_has_active_booking(seat_id) {
        if let Some(seat) = state.seats.get_mut(&seat_id) {
            seat.status = true;
        }
    }

    tracing::info!(booking = %booking_id, seat = %seat_id, "Booking cancelled");
    metrics::counter!("bookings.cancelled").increment(1);

    Ok(smallvec![persist_bookings(state, env)])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::fixtures::{seeded_state, test_env, test_env_with_storage};
    use super::super::ReservationReducer;
    use crate::actions::ReservationAction;
    use crate::error::ReservationError;
    use crate::state::Created;
    use crate::storage::InMemoryBookingStorage;
    use crate::types::{BillboardId, BookingId, Customer, CustomerId, SeatId};
    use cinereservas_core::reducer::Reducer;
    use cinereservas_testing::{assertions, collect_actions, test_date, ReducerTest};

    fn book(billboard: u32, seats: &[u32], customer: u32) -> ReservationAction {
        ReservationAction::CreateBooking {
            billboard_id: BillboardId::new(billboard),
            seat_ids: seats.iter().copied().map(SeatId::new).collect(),
            customer_id: CustomerId::new(customer),
        }
    }

    #[test]
    fn create_booking_books_every_seat() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(book(1, &[1, 2], 2))
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert_eq!(
                    state.last_created,
                    Some(Created::Bookings(vec![BookingId::new(1), BookingId::new(2)]))
                );

                let booking = &state.bookings[&BookingId::new(2)];
                assert_eq!(booking.seat_label, "A2");
                assert_eq!(booking.customer_name, "María González");
                assert_eq!(booking.movie_name, "Aventuras Cósmicas");
                assert_eq!(booking.room_name, "Sala Normal");
                assert_eq!(booking.date, test_date());
                assert!(booking.status);

                assert!(!state.seats[&SeatId::new(1)].status);
                assert!(!state.seats[&SeatId::new(2)].status);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn booking_ids_continue_after_the_highest() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([book(1, &[1], 1), book(1, &[2], 1)])
            .when_action(book(1, &[3], 1))
            .then_state(|state| {
                assert_eq!(
                    state.last_created,
                    Some(Created::Bookings(vec![BookingId::new(3)]))
                );
            })
            .run();
    }

    #[test]
    fn rejects_unknown_billboard() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(book(99, &[1], 1))
            .then_state(|state| {
                assert!(matches!(
                    state.last_error,
                    Some(ReservationError::NotFound { entity: "Billboard", .. })
                ));
                assert!(state.bookings.is_empty());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn rejects_empty_and_duplicate_seat_lists() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(book(1, &[], 1))
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::BadRequest(_))));
            })
            .run();

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(book(1, &[4, 4], 1))
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::BadRequest(_))));
                assert!(state.seats[&SeatId::new(4)].status);
            })
            .run();
    }

    #[test]
    fn rejects_unknown_customer_unless_at_the_kiosk() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(book(1, &[1], 50))
            .then_state(|state| {
                assert!(matches!(
                    state.last_error,
                    Some(ReservationError::NotFound { entity: "Customer", .. })
                ));
            })
            .run();

        let walk_in = Customer {
            id: CustomerId::new(50),
            document_number: "5050".to_string(),
            name: "Ana".to_string(),
            lastname: "Torres".to_string(),
            age: 22,
            phone_number: None,
            email: None,
            status: true,
        };
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([ReservationAction::SetCustomer {
                customer: Some(walk_in),
            }])
            .when_action(book(1, &[1], 50))
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert_eq!(state.bookings[&BookingId::new(1)].customer_name, "Ana Torres");
            })
            .run();
    }

    #[test]
    fn rejects_seats_from_another_room() {
        // Showing 2 is in room 2; seat 1 is in room 1.
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(book(2, &[61, 1], 1))
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::BadRequest(_))));
                assert!(state.bookings.is_empty());
                assert!(state.seats[&SeatId::new(61)].status);
            })
            .run();
    }

    #[test]
    fn occupied_seat_rejects_the_whole_request() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([book(1, &[5], 1)])
            .when_action(book(1, &[6, 5], 2))
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::Conflict(_))));
                assert_eq!(state.bookings.len(), 1);
                assert!(state.seats[&SeatId::new(6)].status);
                assert_eq!(
                    state.last_created,
                    Some(Created::Bookings(vec![BookingId::new(1)]))
                );
            })
            .run();
    }

    #[test]
    fn booked_seats_leave_the_selection() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([
                ReservationAction::SelectBillboard {
                    billboard_id: Some(BillboardId::new(1)),
                },
                ReservationAction::ToggleSeatSelection { seat_id: SeatId::new(7) },
                ReservationAction::ToggleSeatSelection { seat_id: SeatId::new(8) },
            ])
            .when_action(book(1, &[7], 1))
            .then_state(|state| {
                assert_eq!(state.selected_seats, vec![SeatId::new(8)]);
            })
            .run();
    }

    #[test]
    fn cancel_booking_frees_the_seat() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([book(1, &[9], 1)])
            .when_action(ReservationAction::CancelBooking {
                booking_id: BookingId::new(1),
            })
            .then_state(|state| {
                assert!(state.last_error.is_none());
                assert!(!state.bookings[&BookingId::new(1)].status);
                assert!(state.seats[&SeatId::new(9)].status);
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn cancelling_twice_is_not_found() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .given_actions([
                book(1, &[9], 1),
                ReservationAction::CancelBooking {
                    booking_id: BookingId::new(1),
                },
            ])
            .when_action(ReservationAction::CancelBooking {
                booking_id: BookingId::new(1),
            })
            .then_state(|state| {
                assert!(matches!(state.last_error, Some(ReservationError::NotFound { .. })));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn persist_effect_writes_all_bookings() {
        let storage = InMemoryBookingStorage::new();
        let env = test_env_with_storage(storage.clone());
        let mut state = seeded_state();

        let effects = ReservationReducer.reduce(&mut state, book(1, &[1, 2, 3], 1), &env);
        let actions = collect_actions(effects.into_vec()).await;

        assert!(matches!(
            actions.as_slice(),
            [ReservationAction::BookingsPersisted { count: 3 }]
        ));
        assert_eq!(storage.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_booking_and_records_the_error() {
        let storage = InMemoryBookingStorage::new();
        storage.set_failing(true);
        let env = test_env_with_storage(storage);
        let mut state = seeded_state();

        let effects = ReservationReducer.reduce(&mut state, book(1, &[1], 1), &env);
        for action in collect_actions(effects.into_vec()).await {
            ReservationReducer.reduce(&mut state, action, &env);
        }

        assert_eq!(state.bookings.len(), 1);
        assert!(matches!(state.last_error, Some(ReservationError::Storage(_))));
    }
}
