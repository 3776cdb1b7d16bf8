//! Catalog source: where movies, rooms, seats and customers come from.

use crate::types::{Customer, CustomerId, Movie, MovieGenre, MovieId, Room, RoomId, Seat, SeatId};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seat rows per room in the mock catalog
pub const MOCK_ROWS: u16 = 6;

/// Seats per row in the mock catalog
pub const MOCK_SEATS_PER_ROW: u16 = 10;

/// Everything a catalog source serves in one load
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Movies
    pub movies: Vec<Movie>,
    /// Rooms
    pub rooms: Vec<Room>,
    /// Seats of every room
    pub seats: Vec<Seat>,
    /// Registered customers
    pub customers: Vec<Customer>,
}

/// Catalog loading failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The backing source could not be reached or returned garbage
    #[error("Catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Source of catalog data.
///
/// Returns `BoxFuture` so the trait stays object safe.
pub trait CatalogSource: Send + Sync {
    /// Load the full catalog
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the source cannot be read.
    fn load(&self) -> BoxFuture<'_, Result<CatalogSnapshot, CatalogError>>;
}

/// In-process catalog with fixed demo data
#[derive(Clone, Debug)]
pub struct MockCatalog {
    snapshot: CatalogSnapshot,
}

impl MockCatalog {
    /// The demo catalog: twelve movies, three rooms of 6×10 seats, three customers
    #[must_use]
    pub fn new() -> Self {
        let rooms = mock_rooms();
        let seats = rooms.iter().flat_map(|room| seat_grid(room.id)).collect();
        Self {
            snapshot: CatalogSnapshot {
                movies: mock_movies(),
                rooms,
                seats,
                customers: mock_customers(),
            },
        }
    }

    /// A catalog that serves nothing
    #[must_use]
    pub fn empty() -> Self {
        Self {
            snapshot: CatalogSnapshot::default(),
        }
    }

    /// A catalog serving the given snapshot
    #[must_use]
    pub const fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// The data this catalog serves
    #[must_use]
    pub const fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSource for MockCatalog {
    fn load(&self) -> BoxFuture<'_, Result<CatalogSnapshot, CatalogError>> {
        Box::pin(async move { Ok(self.snapshot.clone()) })
    }
}

/// Seat id of a position in the mock grid: `(room−1)·60 + (row−1)·10 + number`
#[must_use]
pub fn mock_seat_id(room: RoomId, row_number: u16, number: u16) -> SeatId {
    let per_room = u32::from(MOCK_ROWS) * u32::from(MOCK_SEATS_PER_ROW);
    SeatId::new(
        room.value().saturating_sub(1) * per_room
            + u32::from(row_number.saturating_sub(1)) * u32::from(MOCK_SEATS_PER_ROW)
            + u32::from(number),
    )
}

fn seat_grid(room_id: RoomId) -> Vec<Seat> {
    (1..=MOCK_ROWS)
        .flat_map(|row_number| {
            (1..=MOCK_SEATS_PER_ROW).map(move |number| Seat {
                id: mock_seat_id(room_id, row_number, number),
                number,
                row_number,
                room_id,
                status: true,
            })
        })
        .collect()
}

fn mock_movies() -> Vec<Movie> {
    [
        ("Aventuras Cósmicas", MovieGenre::ScienceFiction, 12, 120),
        ("El Misterio del Bosque", MovieGenre::Thriller, 16, 95),
        ("Amor en París", MovieGenre::Romance, 12, 110),
        ("Superhéroes Unidos", MovieGenre::Action, 12, 140),
        ("Risas Aseguradas", MovieGenre::Comedy, 7, 90),
        ("Terror en la Oscuridad", MovieGenre::Horror, 18, 105),
        ("Mundos Paralelos", MovieGenre::ScienceFiction, 12, 135),
        ("El Código Secreto", MovieGenre::Thriller, 14, 118),
        ("Fantasía Medieval", MovieGenre::Fantasy, 10, 125),
        ("La Gran Aventura", MovieGenre::Adventure, 7, 105),
        ("Lazos Eternos", MovieGenre::Drama, 13, 122),
        ("Melodías del Corazón", MovieGenre::Musicals, 7, 110),
    ]
    .into_iter()
    .zip(1u32..)
    .map(|((name, genre, allowed_age, length_minutes), id)| Movie {
        id: MovieId::new(id),
        name: name.to_string(),
        genre,
        allowed_age,
        length_minutes,
        status: true,
    })
    .collect()
}

fn mock_rooms() -> Vec<Room> {
    [("Sala Normal", 1), ("Sala 3D", 2), ("Sala VIP", 3)]
        .into_iter()
        .map(|(name, number)| Room {
            id: RoomId::new(u32::from(number)),
            name: name.to_string(),
            number,
            status: true,
        })
        .collect()
}

fn mock_customers() -> Vec<Customer> {
    [
        ("1001", "Juan", "Pérez", 34, "3001234567", "juan.perez@example.com"),
        ("1002", "María", "González", 28, "3007654321", "maria.gonzalez@example.com"),
        ("1003", "Carlos", "Rodríguez", 45, "3109876543", "carlos.rodriguez@example.com"),
    ]
    .into_iter()
    .zip(1u32..)
    .map(|((document, name, lastname, age, phone, email), id)| Customer {
        id: CustomerId::new(id),
        document_number: document.to_string(),
        name: name.to_string(),
        lastname: lastname.to_string(),
        age,
        phone_number: Some(phone.to_string()),
        email: Some(email.to_string()),
        status: true,
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_catalog_serves_demo_data() {
        let snapshot = MockCatalog::new().load().await.unwrap();

        assert_eq!(snapshot.movies.len(), 12);
        assert_eq!(snapshot.rooms.len(), 3);
        assert_eq!(snapshot.seats.len(), 180);
        assert_eq!(snapshot.customers.len(), 3);
        assert_eq!(snapshot.movies[3].name, "Superhéroes Unidos");
        assert_eq!(snapshot.movies[3].length_minutes, 140);
        assert_eq!(snapshot.rooms[2].name, "Sala VIP");
        assert_eq!(snapshot.customers[1].full_name(), "María González");
    }

    #[test]
    fn mock_seat_ids_follow_grid_layout() {
        assert_eq!(mock_seat_id(RoomId::new(1), 1, 1), SeatId::new(1));
        assert_eq!(mock_seat_id(RoomId::new(1), 6, 10), SeatId::new(60));
        assert_eq!(mock_seat_id(RoomId::new(2), 3, 7), SeatId::new(87));

        let catalog = MockCatalog::new();
        let seat = catalog
            .snapshot()
            .seats
            .iter()
            .find(|s| s.id == SeatId::new(87))
            .unwrap();
        assert_eq!(seat.room_id, RoomId::new(2));
        assert_eq!(seat.label(), "C7");
    }

    #[tokio::test]
    async fn empty_catalog_serves_nothing() {
        let snapshot = MockCatalog::empty().load().await.unwrap();
        assert_eq!(snapshot, CatalogSnapshot::default());
    }
}
