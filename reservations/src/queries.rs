//! Read-only queries over [`ReservationState`].
//!
//! Lookups by id return [`ReservationError::NotFound`] for missing or
//! soft-deleted records. List queries return active records only unless noted.

use crate::error::ReservationError;
use crate::state::ReservationState;
use crate::types::{
    Billboard, BillboardId, Booking, BookingId, Customer, CustomerId, Movie, MovieGenre, MovieId,
    Room, RoomId, Seat, SeatId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seat counts of one room across all its showings on a date
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAvailability {
    /// Seats in the room times the number of showings
    pub total: u64,
    /// Active bookings for those showings
    pub occupied: u64,
    /// `total - occupied`
    pub available: u64,
}

/// Which bookings a [`BookingFilter`] keeps by status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Active and cancelled
    #[default]
    All,
    /// Active only
    Active,
    /// Cancelled only
    Cancelled,
}

/// Filter for the booking history list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    /// Case-insensitive substring of the movie name
    #[serde(default)]
    pub movie: Option<String>,
    /// Status to keep
    #[serde(default)]
    pub status: StatusFilter,
    /// Earliest booking date (inclusive)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Latest booking date (inclusive)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl BookingFilter {
    /// Whether `booking` passes every set criterion
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        let movie_matches = self
            .movie
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .is_none_or(|needle| {
                booking
                    .movie_name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            });
        let status_matches = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => booking.status,
            StatusFilter::Cancelled => !booking.status,
        };
        let after_start = self.start_date.is_none_or(|start| booking.date >= start);
        let before_end = self.end_date.is_none_or(|end| booking.date <= end);

        movie_matches && status_matches && after_start && before_end
    }
}

/// The kiosk session resolved to full records
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    /// Selected movie
    pub movie: Option<Movie>,
    /// Selected showing
    pub billboard: Option<Billboard>,
    /// Selected seats, in selection order
    pub seats: Vec<Seat>,
    /// Customer at the kiosk
    pub customer: Option<Customer>,
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ReservationError> {
    if start > end {
        return Err(ReservationError::BadRequest(format!(
            "Start date {start} is after end date {end}"
        )));
    }
    Ok(())
}

fn sorted(mut billboards: Vec<&Billboard>) -> Vec<&Billboard> {
    billboards.sort_by_key(|b| (b.date, b.start_time, b.id));
    billboards
}

impl ReservationState {
    // ========== Movies ==========

    /// Active movies
    #[must_use]
    pub fn active_movies(&self) -> Vec<&Movie> {
        self.movies.values().filter(|m| m.status).collect()
    }

    /// Active movie by id
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if missing or deleted.
    pub fn movie(&self, id: MovieId) -> Result<&Movie, ReservationError> {
        self.movies
            .get(&id)
            .filter(|m| m.status)
            .ok_or_else(|| ReservationError::not_found("Movie", id))
    }

    /// Active movies of a genre
    #[must_use]
    pub fn movies_by_genre(&self, genre: MovieGenre) -> Vec<&Movie> {
        self.movies
            .values()
            .filter(|m| m.status && m.genre == genre)
            .collect()
    }

    // ========== Rooms ==========

    /// Active rooms
    #[must_use]
    pub fn active_rooms(&self) -> Vec<&Room> {
        self.rooms.values().filter(|r| r.status).collect()
    }

    /// Active room by id
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if missing or deleted.
    pub fn room(&self, id: RoomId) -> Result<&Room, ReservationError> {
        self.rooms
            .get(&id)
            .filter(|r| r.status)
            .ok_or_else(|| ReservationError::not_found("Room", id))
    }

    /// Active room by its door number
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if no active room has that number.
    pub fn room_by_number(&self, number: u16) -> Result<&Room, ReservationError> {
        self.rooms
            .values()
            .find(|r| r.status && r.number == number)
            .ok_or_else(|| ReservationError::not_found("Room number", number))
    }

    // ========== Seats ==========

    /// Seat by id, whatever its availability
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if no such seat exists.
    pub fn seat(&self, id: SeatId) -> Result<&Seat, ReservationError> {
        self.seats
            .get(&id)
            .ok_or_else(|| ReservationError::not_found("Seat", id))
    }

    /// Seats of an active room, ordered by row then number
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if the room is missing or deleted.
    pub fn seats_by_room(&self, room_id: RoomId) -> Result<Vec<&Seat>, ReservationError> {
        self.room(room_id)?;
        let mut seats: Vec<&Seat> = self
            .seats
            .values()
            .filter(|s| s.room_id == room_id)
            .collect();
        seats.sort_by_key(|s| (s.row_number, s.number));
        Ok(seats)
    }

    /// Seat at a position in a room
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if the room or the position does not exist.
    pub fn seat_by_position(
        &self,
        room_id: RoomId,
        number: u16,
        row_number: u16,
    ) -> Result<&Seat, ReservationError> {
        self.room(room_id)?;
        self.seats
            .values()
            .find(|s| s.room_id == room_id && s.number == number && s.row_number == row_number)
            .ok_or_else(|| {
                ReservationError::not_found("Seat", format!("room {room_id} row {row_number} number {number}"))
            })
    }

    // ========== Billboards ==========

    /// Active showing by id
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if missing or cancelled.
    pub fn billboard(&self, id: BillboardId) -> Result<&Billboard, ReservationError> {
        self.billboards
            .get(&id)
            .filter(|b| b.status)
            .ok_or_else(|| ReservationError::not_found("Billboard", id))
    }

    /// Whether any showing, active or not, exists for `date`
    #[must_use]
    pub fn has_billboards_on(&self, date: NaiveDate) -> bool {
        self.billboards.values().any(|b| b.date == date)
    }

    /// Active showings on a date, by start time
    #[must_use]
    pub fn billboards_by_date(&self, date: NaiveDate) -> Vec<&Billboard> {
        sorted(
            self.billboards
                .values()
                .filter(|b| b.status && b.date == date)
                .collect(),
        )
    }

    /// Active showings between two dates (inclusive)
    ///
    /// # Errors
    ///
    /// [`ReservationError::BadRequest`] if `start` is after `end`.
    pub fn billboards_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<&Billboard>, ReservationError> {
        check_range(start, end)?;
        Ok(sorted(
            self.billboards
                .values()
                .filter(|b| b.status && (start..=end).contains(&b.date))
                .collect(),
        ))
    }

    /// Active showings of an active room on a date
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if the room is missing or deleted.
    pub fn billboards_by_room_and_date(
        &self,
        room_id: RoomId,
        date: NaiveDate,
    ) -> Result<Vec<&Billboard>, ReservationError> {
        self.room(room_id)?;
        Ok(sorted(
            self.billboards
                .values()
                .filter(|b| b.status && b.room_id == room_id && b.date == date)
                .collect(),
        ))
    }

    /// Active showings of an active movie between two dates
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if the movie is missing or deleted,
    /// [`ReservationError::BadRequest`] for an inverted range.
    pub fn billboards_by_movie_between(
        &self,
        movie_id: MovieId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<&Billboard>, ReservationError> {
        self.movie(movie_id)?;
        Ok(self
            .billboards_between(start, end)?
            .into_iter()
            .filter(|b| b.movie_id == movie_id)
            .collect())
    }

    /// Active showings of movies of a genre between two dates
    ///
    /// # Errors
    ///
    /// [`ReservationError::BadRequest`] for an inverted range.
    pub fn billboards_by_genre_between(
        &self,
        genre: MovieGenre,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<&Billboard>, ReservationError> {
        Ok(self
            .billboards_between(start, end)?
            .into_iter()
            .filter(|b| self.movies.get(&b.movie_id).is_some_and(|m| m.genre == genre))
            .collect())
    }

    /// Seat counts per room for the active showings on `date`.
    ///
    /// Rooms without showings that day are absent.
    #[must_use]
    pub fn seat_availability(&self, date: NaiveDate) -> BTreeMap<RoomId, SeatAvailability> {
        let mut availability: BTreeMap<RoomId, SeatAvailability> = BTreeMap::new();

        for billboard in self.billboards_by_date(date) {
            let seats_in_room = self
                .seats
                .values()
                .filter(|s| s.room_id == billboard.room_id)
                .count() as u64;
            let occupied = self
                .bookings
                .values()
                .filter(|b| b.status && b.billboard_id == billboard.id)
                .count() as u64;

            let entry = availability.entry(billboard.room_id).or_default();
            entry.total += seats_in_room;
            entry.occupied += occupied;
        }

        for entry in availability.values_mut() {
            entry.available = entry.total.saturating_sub(entry.occupied);
        }
        availability
    }

    // ========== Customers ==========

    /// Active customers
    #[must_use]
    pub fn active_customers(&self) -> Vec<&Customer> {
        self.customers.values().filter(|c| c.status).collect()
    }

    /// Active customer by id
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if missing or deleted.
    pub fn customer(&self, id: CustomerId) -> Result<&Customer, ReservationError> {
        self.customers
            .get(&id)
            .filter(|c| c.status)
            .ok_or_else(|| ReservationError::not_found("Customer", id))
    }

    /// Active customer by document number
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if no active customer has that document.
    pub fn customer_by_document(&self, document: &str) -> Result<&Customer, ReservationError> {
        let document = document.trim();
        self.customers
            .values()
            .find(|c| c.status && c.document_number == document)
            .ok_or_else(|| ReservationError::not_found("Customer document", document))
    }

    /// Active customer by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if no active customer has that email.
    pub fn customer_by_email(&self, email: &str) -> Result<&Customer, ReservationError> {
        let email = email.trim();
        self.customers
            .values()
            .find(|c| {
                c.status
                    && c.email
                        .as_deref()
                        .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .ok_or_else(|| ReservationError::not_found("Customer email", email))
    }

    // ========== Bookings ==========

    /// Full booking history, both active and cancelled
    #[must_use]
    pub fn all_bookings(&self) -> Vec<&Booking> {
        self.bookings.values().collect()
    }

    /// Booking by id, whatever its status
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if no such booking exists.
    pub fn booking(&self, id: BookingId) -> Result<&Booking, ReservationError> {
        self.bookings
            .get(&id)
            .ok_or_else(|| ReservationError::not_found("Booking", id))
    }

    /// Active bookings of a customer
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if the customer is unknown.
    pub fn bookings_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<&Booking>, ReservationError> {
        let known = self.customers.contains_key(&customer_id)
            || self
                .current_customer
                .as_ref()
                .is_some_and(|c| c.id == customer_id);
        if !known {
            return Err(ReservationError::not_found("Customer", customer_id));
        }
        Ok(self
            .bookings
            .values()
            .filter(|b| b.status && b.customer_id == customer_id)
            .collect())
    }

    /// Active bookings of an active showing
    ///
    /// # Errors
    ///
    /// [`ReservationError::NotFound`] if the showing is missing or cancelled.
    pub fn bookings_by_billboard(
        &self,
        billboard_id: BillboardId,
    ) -> Result<Vec<&Booking>, ReservationError> {
        self.billboard(billboard_id)?;
        Ok(self
            .bookings
            .values()
            .filter(|b| b.status && b.billboard_id == billboard_id)
            .collect())
    }

    /// Active bookings made between two dates (inclusive)
    ///
    /// # Errors
    ///
    /// [`ReservationError::BadRequest`] if `start` is after `end`.
    pub fn bookings_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<&Booking>, ReservationError> {
        check_range(start, end)?;
        Ok(self
            .bookings
            .values()
            .filter(|b| b.status && (start..=end).contains(&b.date))
            .collect())
    }

    /// Booking history narrowed by `filter`
    #[must_use]
    pub fn filter_bookings(&self, filter: &BookingFilter) -> Vec<&Booking> {
        self.bookings.values().filter(|b| filter.matches(b)).collect()
    }

    // ========== Kiosk session ==========

    /// The kiosk selection with full records
    #[must_use]
    pub fn selection(&self) -> SelectionView {
        SelectionView {
            movie: self
                .selected_movie
                .and_then(|id| self.movies.get(&id))
                .cloned(),
            billboard: self
                .selected_billboard
                .and_then(|id| self.billboards.get(&id))
                .cloned(),
            seats: self
                .selected_seats
                .iter()
                .filter_map(|id| self.seats.get(id))
                .cloned()
                .collect(),
            customer: self.current_customer.clone(),
        }
    }
}
