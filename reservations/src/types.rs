//! Domain types for the reservation engine.
//!
//! Entities mirror the wire format of the cinema back-office: camelCase JSON,
//! numeric identifiers, and a `status` flag on every record (active vs.
//! soft-deleted, or for seats: available vs. occupied).

use crate::error::ReservationError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[doc = concat!("Creates a `", stringify!($name), "` from its numeric value")]
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the inner value
            #[must_use]
            pub const fn value(&self) -> u32 {
                self.0
            }

            /// The identifier following this one
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a movie
    MovieId
);
numeric_id!(
    /// Identifier of a screening room
    RoomId
);
numeric_id!(
    /// Identifier of a physical seat
    SeatId
);
numeric_id!(
    /// Identifier of a billboard entry (one showing)
    BillboardId
);
numeric_id!(
    /// Identifier of a customer
    CustomerId
);
numeric_id!(
    /// Identifier of a booking (one seat for one showing)
    BookingId
);

// ============================================================================
// Time formatting
// ============================================================================

/// Serde adapter for `HH:MM` times.
///
/// Deserialization also accepts `HH:MM:SS`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    /// Parse `HH:MM` or `HH:MM:SS`
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error if neither format matches.
    pub fn parse(value: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
    }

    /// Serialize as `HH:MM`
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    /// Deserialize from `HH:MM` or `HH:MM:SS`
    ///
    /// # Errors
    ///
    /// Fails on malformed times.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module for optional fields
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize `Some` as `HH:MM`, `None` as null
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional `HH:MM` time
        ///
        /// # Errors
        ///
        /// Fails on malformed times.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

// ============================================================================
// Movies
// ============================================================================

/// Movie genre
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum MovieGenre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Musicals,
    Romance,
    ScienceFiction,
    Thriller,
}

impl MovieGenre {
    /// Every genre, in catalog order
    pub const ALL: [Self; 10] = [
        Self::Action,
        Self::Adventure,
        Self::Comedy,
        Self::Drama,
        Self::Fantasy,
        Self::Horror,
        Self::Musicals,
        Self::Romance,
        Self::ScienceFiction,
        Self::Thriller,
    ];

    /// Wire name, e.g. `SCIENCE_FICTION`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Adventure => "ADVENTURE",
            Self::Comedy => "COMEDY",
            Self::Drama => "DRAMA",
            Self::Fantasy => "FANTASY",
            Self::Horror => "HORROR",
            Self::Musicals => "MUSICALS",
            Self::Romance => "ROMANCE",
            Self::ScienceFiction => "SCIENCE_FICTION",
            Self::Thriller => "THRILLER",
        }
    }
}

impl fmt::Display for MovieGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieGenre {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReservationError::BadRequest(format!("Unknown movie genre: {s}")))
    }
}

/// A movie in the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Identifier
    pub id: MovieId,
    /// Title
    pub name: String,
    /// Genre
    pub genre: MovieGenre,
    /// Minimum viewer age
    pub allowed_age: u16,
    /// Running time in minutes
    pub length_minutes: u16,
    /// Active flag
    pub status: bool,
}

/// Fields of a movie supplied by an administrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDraft {
    /// Title (at most 100 characters)
    pub name: String,
    /// Genre
    pub genre: MovieGenre,
    /// Minimum viewer age
    pub allowed_age: u16,
    /// Running time in minutes, greater than zero
    pub length_minutes: u16,
}

impl MovieDraft {
    /// Field-level validation
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::BadRequest`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ReservationError> {
        require_text("Movie name", &self.name, 100)?;
        if self.length_minutes == 0 {
            return Err(ReservationError::BadRequest(
                "Movie length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the movie with the given id
    #[must_use]
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            name: self.name.trim().to_string(),
            genre: self.genre,
            allowed_age: self.allowed_age,
            length_minutes: self.length_minutes,
            status: true,
        }
    }
}

// ============================================================================
// Rooms and seats
// ============================================================================

/// A screening room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Identifier
    pub id: RoomId,
    /// Display name, e.g. "Sala VIP"
    pub name: String,
    /// Room number shown at the door
    pub number: u16,
    /// Active flag
    pub status: bool,
}

/// Fields of a room supplied by an administrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDraft {
    /// Display name (at most 50 characters)
    pub name: String,
    /// Room number, unique among active rooms
    pub number: u16,
}

impl RoomDraft {
    /// Field-level validation
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::BadRequest`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ReservationError> {
        require_text("Room name", &self.name, 50)
    }

    /// Build the room with the given id
    #[must_use]
    pub fn into_room(self, id: RoomId) -> Room {
        Room {
            id,
            name: self.name.trim().to_string(),
            number: self.number,
            status: true,
        }
    }
}

/// A physical seat in a room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    /// Identifier
    pub id: SeatId,
    /// Position within the row, starting at 1
    pub number: u16,
    /// Row, starting at 1 (row 1 is labelled `A`)
    pub row_number: u16,
    /// Room the seat belongs to
    pub room_id: RoomId,
    /// `true` when the seat is available
    pub status: bool,
}

impl Seat {
    /// Human label: row letter followed by the seat number, e.g. `C7`
    #[must_use]
    pub fn label(&self) -> String {
        seat_label(self.row_number, self.number)
    }
}

/// Label for a seat position. Rows past `Z` keep their number: `27-4`.
#[must_use]
pub fn seat_label(row_number: u16, number: u16) -> String {
    match row_number {
        1..=26 => {
            let letter = char::from(b'A' + u8::try_from(row_number - 1).unwrap_or(0));
            format!("{letter}{number}")
        },
        _ => format!("{row_number}-{number}"),
    }
}

/// Fields of a seat supplied by an administrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatDraft {
    /// Position within the row, at least 1
    pub number: u16,
    /// Row, at least 1
    pub row_number: u16,
    /// Room the seat belongs to
    pub room_id: RoomId,
    /// Initial availability (defaults to available)
    #[serde(default)]
    pub status: Option<bool>,
}

impl SeatDraft {
    /// Field-level validation
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::BadRequest`] when the row or number is zero.
    pub fn validate(&self) -> Result<(), ReservationError> {
        if self.number == 0 || self.row_number == 0 {
            return Err(ReservationError::BadRequest(
                "Seat row and number must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Billboards
// ============================================================================

/// One scheduled showing of a movie in a room on a date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    /// Identifier
    pub id: BillboardId,
    /// Showing date
    pub date: NaiveDate,
    /// Start time
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End time (start plus movie length, wrapping past midnight)
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Movie shown
    pub movie_id: MovieId,
    /// Movie title at scheduling time
    pub movie_name: String,
    /// Room used
    pub room_id: RoomId,
    /// Room name at scheduling time
    pub room_name: String,
    /// Active flag
    pub status: bool,
}

/// Fields of a showing supplied by an administrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardDraft {
    /// Showing date
    pub date: NaiveDate,
    /// Start time
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End time; derived from the movie length when absent
    #[serde(default, with = "hhmm::option")]
    pub end_time: Option<NaiveTime>,
    /// Movie to show
    pub movie_id: MovieId,
    /// Room to use
    pub room_id: RoomId,
}

// ============================================================================
// Customers
// ============================================================================

/// A registered customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Identifier
    pub id: CustomerId,
    /// National document number, unique among active customers
    pub document_number: String,
    /// First name
    pub name: String,
    /// Last name
    pub lastname: String,
    /// Age in years
    pub age: u16,
    /// Optional phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Optional email, unique among active customers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Active flag
    pub status: bool,
}

impl Customer {
    /// `"name lastname"`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }

    /// Email if known, otherwise the phone number
    #[must_use]
    pub fn contact(&self) -> &str {
        self.email
            .as_deref()
            .or(self.phone_number.as_deref())
            .unwrap_or("no contact")
    }
}

/// Fields of a customer supplied at registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    /// National document number
    pub document_number: String,
    /// First name
    pub name: String,
    /// Last name
    pub lastname: String,
    /// Age in years, at least 1
    pub age: u16,
    /// Optional phone number
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Optional email
    #[serde(default)]
    pub email: Option<String>,
}

impl CustomerDraft {
    /// Field-level validation
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::BadRequest`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ReservationError> {
        require_text("Customer name", &self.name, 30)?;
        require_text("Customer lastname", &self.lastname, 30)?;
        require_text("Document number", &self.document_number, 20)?;
        if self.age == 0 {
            return Err(ReservationError::BadRequest(
                "Customer age must be at least 1".to_string(),
            ));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !looks_like_email(email) {
                return Err(ReservationError::BadRequest(format!("Invalid email: {email}")));
            }
        }
        Ok(())
    }

    /// Build the customer with the given id
    #[must_use]
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            document_number: self.document_number.trim().to_string(),
            name: self.name.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            age: self.age,
            phone_number: self.phone_number.filter(|p| !p.trim().is_empty()),
            email: self.email.filter(|e| !e.trim().is_empty()),
            status: true,
        }
    }
}

/// `local@domain.tld`: no whitespace, one `@`, a dot after it with text on both sides
#[must_use]
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

// ============================================================================
// Bookings
// ============================================================================

/// One seat booked for one showing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Identifier
    pub id: BookingId,
    /// Date the booking was made
    pub date: NaiveDate,
    /// Who booked
    pub customer_id: CustomerId,
    /// `"name lastname"` at booking time
    pub customer_name: String,
    /// Seat booked
    pub seat_id: SeatId,
    /// Seat label, e.g. `B4`
    pub seat_label: String,
    /// Showing booked
    pub billboard_id: BillboardId,
    /// Movie title of the showing
    pub movie_name: String,
    /// Room name of the showing
    pub room_name: String,
    /// `false` once cancelled
    pub status: bool,
}

// ============================================================================
// Helpers
// ============================================================================

fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), ReservationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReservationError::BadRequest(format!("{field} is required")));
    }
    if value.chars().count() > max_chars {
        return Err(ReservationError::BadRequest(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seat_labels_use_row_letters() {
        assert_eq!(seat_label(1, 5), "A5");
        assert_eq!(seat_label(3, 7), "C7");
        assert_eq!(seat_label(26, 1), "Z1");
        assert_eq!(seat_label(27, 4), "27-4");
    }

    #[test]
    fn genre_parses_case_insensitively() {
        assert_eq!("science_fiction".parse::<MovieGenre>().ok(), Some(MovieGenre::ScienceFiction));
        assert!("WESTERN".parse::<MovieGenre>().is_err());
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("juan@example.com"));
        assert!(!looks_like_email("juan@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("juan perez@example.com"));
    }

    #[test]
    fn billboard_times_serialize_as_hours_and_minutes() {
        let json = r#"{"date":"2025-01-01","startTime":"22:00","movieId":4,"roomId":1}"#;
        let draft: BillboardDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.start_time, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(draft.end_time, None);

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["startTime"], "22:00");
        assert_eq!(value["movieId"], 4);
    }

    #[test]
    fn customer_draft_validation() {
        let mut draft = CustomerDraft {
            document_number: "1234".to_string(),
            name: "Juan".to_string(),
            lastname: "Pérez".to_string(),
            age: 30,
            phone_number: None,
            email: Some("juan@example.com".to_string()),
        };
        assert!(draft.validate().is_ok());

        draft.email = Some("not-an-email".to_string());
        assert!(matches!(draft.validate(), Err(ReservationError::BadRequest(_))));

        draft.email = None;
        draft.age = 0;
        assert!(draft.validate().is_err());
    }
}
