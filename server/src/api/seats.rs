//! Seat endpoints.
//!
//! - GET /api/seats/room/:room_id - Seats of an active room
//! - GET /api/seats/room/:room_id/position?number=&rowNumber= - Seat at a position
//! - GET /api/seats/:id - One seat
//! - POST /api/seats - Add a seat
//! - PUT /api/seats/:id - Move or re-number a seat
//! - DELETE /api/seats/:id - Remove a seat
//! - PUT /api/seats/:id/enable, /disable, /toggle - Change availability

use super::{command, execute, query};
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinereservas::{Created, ReservationAction, RoomId, Seat, SeatDraft, SeatId};
use serde::Deserialize;

/// Position of a seat within its room
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatPosition {
    /// Position within the row
    pub number: u16,
    /// Row
    pub row_number: u16,
}

/// List the seats of a room.
///
/// # Errors
///
/// 404 if the room is missing or deleted.
pub async fn seats_by_room(
    State(app): State<AppState>,
    ApiPath(room_id): ApiPath<u32>,
) -> Result<Json<Vec<Seat>>, AppError> {
    let seats = query(&app, |s| {
        s.seats_by_room(RoomId::new(room_id))
            .map(|seats| seats.into_iter().cloned().collect())
    })
    .await?;
    Ok(Json(seats))
}

/// Find the seat at a position.
///
/// # Errors
///
/// 404 if the room or the seat does not exist.
pub async fn seat_by_position(
    State(app): State<AppState>,
    ApiPath(room_id): ApiPath<u32>,
    ApiQuery(position): ApiQuery<SeatPosition>,
) -> Result<Json<Seat>, AppError> {
    let seat = query(&app, |s| {
        s.seat_by_position(RoomId::new(room_id), position.number, position.row_number)
            .cloned()
    })
    .await?;
    Ok(Json(seat))
}

/// Get one seat.
///
/// # Errors
///
/// 404 if the seat does not exist.
pub async fn get_seat(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Seat>, AppError> {
    let seat = query(&app, |s| s.seat(SeatId::new(id)).cloned()).await?;
    Ok(Json(seat))
}

/// Add a seat.
///
/// # Errors
///
/// 400 for invalid fields, 404 for an unknown room, 409 if the position is taken.
pub async fn create_seat(
    State(app): State<AppState>,
    ApiJson(draft): ApiJson<SeatDraft>,
) -> Result<(StatusCode, Json<Seat>), AppError> {
    let seat = command(&app, ReservationAction::CreateSeat { draft }, |s| {
        match s.last_created {
            Some(Created::Seat(id)) => s.seats.get(&id).cloned(),
            _ => None,
        }
    })
    .await?;

    Ok((StatusCode::CREATED, Json(seat)))
}

/// Move or re-number a seat.
///
/// # Errors
///
/// 404 for an unknown seat or room, 409 if the seat is booked or the
/// position is taken.
pub async fn update_seat(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
    ApiJson(draft): ApiJson<SeatDraft>,
) -> Result<Json<Seat>, AppError> {
    let seat_id = SeatId::new(id);
    let seat = command(&app, ReservationAction::UpdateSeat { seat_id, draft }, |s| {
        s.seats.get(&seat_id).cloned()
    })
    .await?;

    Ok(Json(seat))
}

/// Remove a seat.
///
/// # Errors
///
/// 404 for an unknown seat, 409 if it has active bookings.
pub async fn delete_seat(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::DeleteSeat {
            seat_id: SeatId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Make a seat available.
///
/// # Errors
///
/// 404 for an unknown seat, 409 if it is booked.
pub async fn enable_seat(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    set_status(&app, id, true).await
}

/// Take a seat out of service.
///
/// # Errors
///
/// 404 for an unknown seat.
pub async fn disable_seat(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    set_status(&app, id, false).await
}

/// Flip a seat's availability and return it.
///
/// # Errors
///
/// 404 for an unknown seat, 409 if enabling a booked seat.
pub async fn toggle_seat(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Seat>, AppError> {
    let seat_id = SeatId::new(id);
    let seat = command(&app, ReservationAction::ToggleSeatStatus { seat_id }, |s| {
        s.seats.get(&seat_id).cloned()
    })
    .await?;

    Ok(Json(seat))
}

async fn set_status(app: &AppState, id: u32, available: bool) -> Result<StatusCode, AppError> {
    execute(
        app,
        ReservationAction::SetSeatStatus {
            seat_id: SeatId::new(id),
            available,
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
