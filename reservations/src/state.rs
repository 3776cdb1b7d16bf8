//! The reservation state container.

use crate::error::ReservationError;
use crate::types::{
    Billboard, BillboardId, Booking, BookingId, Customer, CustomerId, Movie, MovieId, Room, RoomId,
    Seat, SeatId,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Identifiers produced by the most recent accepted command
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "ids")]
pub enum Created {
    /// A movie was added
    Movie(MovieId),
    /// A room was added
    Room(RoomId),
    /// A seat was added
    Seat(SeatId),
    /// A showing was scheduled
    Billboard(BillboardId),
    /// A customer was registered
    Customer(CustomerId),
    /// Bookings were made, one per seat
    Bookings(Vec<BookingId>),
}

/// Everything the reservation engine knows.
///
/// Catalog collections are keyed by id. The kiosk session fields hold the
/// single shared selection (movie, showing, seats, customer). `last_error`
/// and `last_created` describe the outcome of the most recent command.
#[derive(Clone, Debug, Default)]
pub struct ReservationState {
    /// Movies, including soft-deleted ones
    pub movies: BTreeMap<MovieId, Movie>,
    /// Rooms, including soft-deleted ones
    pub rooms: BTreeMap<RoomId, Room>,
    /// Seats of every room
    pub seats: BTreeMap<SeatId, Seat>,
    /// Showings, including cancelled ones
    pub billboards: BTreeMap<BillboardId, Billboard>,
    /// Customers, including soft-deleted ones
    pub customers: BTreeMap<CustomerId, Customer>,
    /// Booking history
    pub bookings: BTreeMap<BookingId, Booking>,

    /// Movie picked in the kiosk
    pub selected_movie: Option<MovieId>,
    /// Showing picked in the kiosk
    pub selected_billboard: Option<BillboardId>,
    /// Seats picked in the kiosk, in the order they were picked
    pub selected_seats: Vec<SeatId>,
    /// Customer at the kiosk
    pub current_customer: Option<Customer>,

    /// Whether the catalog source has been loaded at least once
    pub catalog_loaded: bool,
    /// Error of the most recent command, if it was rejected
    pub last_error: Option<ReservationError>,
    /// Ids created by the most recent accepted command
    pub last_created: Option<Created>,
}

impl ReservationState {
    /// Empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_movie_id(&self) -> MovieId {
        self.movies.keys().next_back().map_or(MovieId::new(1), MovieId::next)
    }

    pub(crate) fn next_room_id(&self) -> RoomId {
        self.rooms.keys().next_back().map_or(RoomId::new(1), RoomId::next)
    }

    pub(crate) fn next_seat_id(&self) -> SeatId {
        self.seats.keys().next_back().map_or(SeatId::new(1), SeatId::next)
    }

    pub(crate) fn next_billboard_id(&self) -> BillboardId {
        self.billboards
            .keys()
            .next_back()
            .map_or(BillboardId::new(1), BillboardId::next)
    }

    pub(crate) fn next_customer_id(&self) -> CustomerId {
        self.customers
            .keys()
            .next_back()
            .map_or(CustomerId::new(1), CustomerId::next)
    }

    pub(crate) fn next_booking_id(&self) -> BookingId {
        self.bookings
            .keys()
            .next_back()
            .map_or(BookingId::new(1), BookingId::next)
    }

    /// Whether any active booking holds `seat_id`
    #[must_use]
    pub fn seat_has_active_booking(&self, seat_id: SeatId) -> bool {
        self.bookings
            .values()
            .any(|booking| booking.status && booking.seat_id == seat_id)
    }

    /// Active booking of `seat_id` for the showing `billboard_id`, if any
    #[must_use]
    pub fn active_booking_for(&self, billboard_id: BillboardId, seat_id: SeatId) -> Option<&Booking> {
        self.bookings.values().find(|booking| {
            booking.status && booking.billboard_id == billboard_id && booking.seat_id == seat_id
        })
    }

    /// Mark every seat held by an active booking as occupied
    pub(crate) fn occupy_booked_seats(&mut self) {
        let booked: Vec<SeatId> = self
            .bookings
            .values()
            .filter(|booking| booking.status)
            .map(|booking| booking.seat_id)
            .collect();
        for seat_id in booked {
            if let Some(seat) = self.seats.get_mut(&seat_id) {
                seat.status = false;
            }
        }
    }

    /// Drop selections that point at records that no longer exist or are inactive
    pub(crate) fn prune_selection(&mut self) {
        if let Some(movie_id) = self.selected_movie {
            if !self.movies.get(&movie_id).is_some_and(|m| m.status) {
                self.selected_movie = None;
                self.selected_billboard = None;
                self.selected_seats.clear();
            }
        }
        if let Some(billboard_id) = self.selected_billboard {
            if !self.billboards.get(&billboard_id).is_some_and(|b| b.status) {
                self.selected_billboard = None;
                self.selected_seats.clear();
            }
        }
        let seats = &self.seats;
        self.selected_seats
            .retain(|seat_id| seats.get(seat_id).is_some_and(|s| s.status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieGenre;

    #[test]
    fn next_ids_follow_the_highest_key() {
        let mut state = ReservationState::new();
        assert_eq!(state.next_movie_id(), MovieId::new(1));

        for id in [3, 9] {
            state.movies.insert(
                MovieId::new(id),
                Movie {
                    id: MovieId::new(id),
                    name: "X".to_string(),
                    genre: MovieGenre::Comedy,
                    allowed_age: 0,
                    length_minutes: 90,
                    status: id == 3,
                },
            );
        }
        assert_eq!(state.next_movie_id(), MovieId::new(10));
    }

    #[test]
    fn prune_selection_drops_inactive_movie() {
        let mut state = ReservationState::new();
        state.selected_movie = Some(MovieId::new(1));
        state.selected_billboard = Some(BillboardId::new(1));
        state.selected_seats = vec![SeatId::new(1)];

        state.prune_selection();

        assert!(state.selected_movie.is_none());
        assert!(state.selected_billboard.is_none());
        assert!(state.selected_seats.is_empty());
    }
}
