//! Billboard (showing) endpoints.
//!
//! - GET /api/billboards/date/:date - Showings of a day; generates the default lineup on first request
//! - GET /api/billboards/dateRange?startDate=&endDate= - Showings in a range
//! - GET /api/billboards/room/:room_id/date/:date - Showings of a room on a day
//! - GET /api/billboards/movie/:movie_id/dateRange - Showings of a movie in a range
//! - GET /api/billboards/genre/:genre/dateRange - Showings of a genre in a range
//! - GET /api/billboards/seatsAvailability/date/:date - Seat counts per room
//! - GET /api/billboards/:id - One showing
//! - POST /api/billboards - Schedule a showing
//! - PUT /api/billboards/:id - Reschedule a showing
//! - DELETE /api/billboards/:id - Remove a showing without bookings
//! - PUT /api/billboards/:id/cancel - Cancel a showing and its bookings

use super::{command, execute, query, DateRange};
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use cinereservas::{
    Billboard, BillboardDraft, BillboardId, Created, MovieGenre, MovieId, ReservationAction,
    RoomId, SeatAvailability,
};
use std::collections::BTreeMap;

fn owned(billboards: Vec<&Billboard>) -> Vec<Billboard> {
    billboards.into_iter().cloned().collect()
}

/// Showings of a day.
///
/// The first request for a date without showings schedules the default
/// lineup for it.
///
/// # Errors
///
/// 503 while the store is shutting down.
pub async fn billboards_by_date(
    State(app): State<AppState>,
    ApiPath(date): ApiPath<NaiveDate>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let billboards = command(&app, ReservationAction::LoadBillboards { date }, |s| {
        Some(owned(s.billboards_by_date(date)))
    })
    .await?;
    Ok(Json(billboards))
}

/// Showings between two dates.
///
/// # Errors
///
/// 400 if `startDate` is after `endDate`.
pub async fn billboards_between(
    State(app): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let billboards = query(&app, |s| {
        s.billboards_between(range.start_date, range.end_date).map(owned)
    })
    .await?;
    Ok(Json(billboards))
}

/// Showings of a room on a day.
///
/// # Errors
///
/// 404 for an unknown room.
pub async fn billboards_by_room_and_date(
    State(app): State<AppState>,
    ApiPath((room_id, date)): ApiPath<(u32, NaiveDate)>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let billboards = query(&app, |s| {
        s.billboards_by_room_and_date(RoomId::new(room_id), date)
            .map(owned)
    })
    .await?;
    Ok(Json(billboards))
}

/// Showings of a movie between two dates.
///
/// # Errors
///
/// 404 for an unknown movie, 400 for an inverted range.
pub async fn billboards_by_movie(
    State(app): State<AppState>,
    ApiPath(movie_id): ApiPath<u32>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let billboards = query(&app, |s| {
        s.billboards_by_movie_between(MovieId::new(movie_id), range.start_date, range.end_date)
            .map(owned)
    })
    .await?;
    Ok(Json(billboards))
}

/// Showings of a genre between two dates.
///
/// # Errors
///
/// 400 for an unknown genre or an inverted range.
pub async fn billboards_by_genre(
    State(app): State<AppState>,
    ApiPath(genre): ApiPath<String>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let genre: MovieGenre = genre.parse()?;
    let billboards = query(&app, |s| {
        s.billboards_by_genre_between(genre, range.start_date, range.end_date)
            .map(owned)
    })
    .await?;
    Ok(Json(billboards))
}

/// Seat counts per room for the showings of a day, keyed by room id.
pub async fn seats_availability(
    State(app): State<AppState>,
    ApiPath(date): ApiPath<NaiveDate>,
) -> Json<BTreeMap<RoomId, SeatAvailability>> {
    Json(app.store.state(|s| s.seat_availability(date)).await)
}

/// Get one showing.
///
/// # Errors
///
/// 404 if the showing is missing or cancelled.
pub async fn get_billboard(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Billboard>, AppError> {
    let billboard = query(&app, |s| s.billboard(BillboardId::new(id)).cloned()).await?;
    Ok(Json(billboard))
}

/// Schedule a showing.
///
/// # Errors
///
/// 404 for an unknown movie or room, 400 for a zero-length showing.
pub async fn create_billboard(
    State(app): State<AppState>,
    ApiJson(draft): ApiJson<BillboardDraft>,
) -> Result<(StatusCode, Json<Billboard>), AppError> {
    let billboard = command(&app, ReservationAction::ScheduleBillboard { draft }, |s| {
        match s.last_created {
            Some(Created::Billboard(id)) => s.billboards.get(&id).cloned(),
            _ => None,
        }
    })
    .await?;

    Ok((StatusCode::CREATED, Json(billboard)))
}

/// Reschedule a showing.
///
/// # Errors
///
/// 404 for an unknown showing, movie or room, 409 when moving a showing
/// with bookings to another room.
pub async fn update_billboard(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
    ApiJson(draft): ApiJson<BillboardDraft>,
) -> Result<Json<Billboard>, AppError> {
    let billboard_id = BillboardId::new(id);
    let billboard = command(
        &app,
        ReservationAction::UpdateBillboard {
            billboard_id,
            draft,
        },
        |s| s.billboards.get(&billboard_id).cloned(),
    )
    .await?;

    Ok(Json(billboard))
}

/// Remove a showing that has no active bookings.
///
/// # Errors
///
/// 404 for an unknown showing, 409 if it has active bookings.
pub async fn delete_billboard(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::DeleteBillboard {
            billboard_id: BillboardId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Cancel a showing together with its bookings.
///
/// # Errors
///
/// 404 for an unknown or already cancelled showing, 400 for a past showing.
pub async fn cancel_billboard(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::CancelBillboard {
            billboard_id: BillboardId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
