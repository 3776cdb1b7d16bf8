//! Errors produced by reservation commands.

use thiserror::Error;

/// Why a reservation command was rejected.
///
/// The variant is the error class the HTTP layer maps to a status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Referenced record does not exist or is inactive
    #[error("{entity} not found with id: {id}")]
    NotFound {
        /// Kind of record, e.g. "Seat"
        entity: &'static str,
        /// Identifier or lookup key that was used
        id: String,
    },

    /// Malformed or inconsistent request
    #[error("{0}")]
    BadRequest(String),

    /// Request collides with existing state
    #[error("{0}")]
    Conflict(String),

    /// Bookings could not be written or read
    #[error("Booking storage failed: {0}")]
    Storage(String),
}

impl ReservationError {
    /// Shorthand for [`ReservationError::NotFound`]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Short machine-readable code for this error class
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let error = ReservationError::not_found("Billboard", 12);
        assert_eq!(error.to_string(), "Billboard not found with id: 12");
        assert_eq!(error.code(), "NOT_FOUND");
    }
}
