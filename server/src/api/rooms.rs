//! Room endpoints.
//!
//! - GET /api/rooms - Active rooms
//! - GET /api/rooms/:id - One room
//! - GET /api/rooms/number/:number - Active room by number
//! - POST /api/rooms - Add a room
//! - PUT /api/rooms/:id - Replace a room's fields
//! - DELETE /api/rooms/:id - Soft-delete a room

use super::{command, execute, query};
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinereservas::{Created, ReservationAction, Room, RoomDraft, RoomId};

/// List active rooms.
pub async fn list_rooms(State(app): State<AppState>) -> Json<Vec<Room>> {
    Json(
        app.store
            .state(|s| s.active_rooms().into_iter().cloned().collect())
            .await,
    )
}

/// Get one room.
///
/// # Errors
///
/// 404 if the room is missing or deleted.
pub async fn get_room(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Room>, AppError> {
    let room = query(&app, |s| s.room(RoomId::new(id)).cloned()).await?;
    Ok(Json(room))
}

/// Get the active room with a number.
///
/// # Errors
///
/// 404 if no active room has that number.
pub async fn room_by_number(
    State(app): State<AppState>,
    ApiPath(number): ApiPath<u16>,
) -> Result<Json<Room>, AppError> {
    let room = query(&app, |s| s.room_by_number(number).cloned()).await?;
    Ok(Json(room))
}

/// Add a room.
///
/// # Errors
///
/// 400 for invalid fields, 409 if the number is taken.
pub async fn create_room(
    State(app): State<AppState>,
    ApiJson(draft): ApiJson<RoomDraft>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let room = command(&app, ReservationAction::CreateRoom { draft }, |s| {
        match s.last_created {
            Some(Created::Room(id)) => s.rooms.get(&id).cloned(),
            _ => None,
        }
    })
    .await?;

    Ok((StatusCode::CREATED, Json(room)))
}

/// Replace a room's fields.
///
/// # Errors
///
/// 404 if the room is missing, 400 for invalid fields, 409 if the number is taken.
pub async fn update_room(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
    ApiJson(draft): ApiJson<RoomDraft>,
) -> Result<Json<Room>, AppError> {
    let room_id = RoomId::new(id);
    let room = command(&app, ReservationAction::UpdateRoom { room_id, draft }, |s| {
        s.rooms.get(&room_id).cloned()
    })
    .await?;

    Ok(Json(room))
}

/// Soft-delete a room.
///
/// # Errors
///
/// 404 if the room is missing or already deleted.
pub async fn delete_room(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::DeleteRoom {
            room_id: RoomId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
