//! Kiosk session endpoints.
//!
//! One shared selection per server: movie, showing, seats and the customer
//! at the kiosk. Every mutation answers with the resulting selection.
//!
//! - GET /api/selection
//! - PUT /api/selection/movie `{ "movieId": 1 | null }`
//! - PUT /api/selection/billboard `{ "billboardId": 1 | null }`
//! - POST /api/selection/seats/:seat_id/toggle
//! - PUT /api/selection/customer `Customer | null`
//! - POST /api/selection/checkout - Book the selected seats

use super::bookings::created_bookings;
use super::command;
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinereservas::{
    BillboardId, Booking, Customer, MovieId, ReservationAction, ReservationState, SeatId,
    SelectionView,
};
use serde::Deserialize;

/// Body of `PUT /selection/movie`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectMovieRequest {
    /// Movie to select, or `null` to clear
    pub movie_id: Option<MovieId>,
}

/// Body of `PUT /selection/billboard`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectBillboardRequest {
    /// Showing to select, or `null` to clear
    pub billboard_id: Option<BillboardId>,
}

async fn apply(app: &AppState, action: ReservationAction) -> Result<Json<SelectionView>, AppError> {
    let view = command(app, action, |s| Some(s.selection())).await?;
    Ok(Json(view))
}

/// Current selection.
pub async fn get_selection(State(app): State<AppState>) -> Json<SelectionView> {
    Json(app.store.state(ReservationState::selection).await)
}

/// Select a movie; clears the showing and seats.
///
/// # Errors
///
/// 404 for an unknown movie.
pub async fn select_movie(
    State(app): State<AppState>,
    ApiJson(request): ApiJson<SelectMovieRequest>,
) -> Result<Json<SelectionView>, AppError> {
    apply(
        &app,
        ReservationAction::SelectMovie {
            movie_id: request.movie_id,
        },
    )
    .await
}

/// Select a showing; clears the seats.
///
/// # Errors
///
/// 404 for an unknown or cancelled showing.
pub async fn select_billboard(
    State(app): State<AppState>,
    ApiJson(request): ApiJson<SelectBillboardRequest>,
) -> Result<Json<SelectionView>, AppError> {
    apply(
        &app,
        ReservationAction::SelectBillboard {
            billboard_id: request.billboard_id,
        },
    )
    .await
}

/// Add a seat to the selection, or remove it if already selected.
///
/// # Errors
///
/// 404 for an unknown seat, 409 for an occupied seat, 400 for a seat
/// outside the selected showing's room.
pub async fn toggle_seat(
    State(app): State<AppState>,
    ApiPath(seat_id): ApiPath<u32>,
) -> Result<Json<SelectionView>, AppError> {
    apply(
        &app,
        ReservationAction::ToggleSeatSelection {
            seat_id: SeatId::new(seat_id),
        },
    )
    .await
}

/// Set or clear the customer at the kiosk.
///
/// # Errors
///
/// 503 while the store is shutting down.
pub async fn set_customer(
    State(app): State<AppState>,
    ApiJson(customer): ApiJson<Option<Customer>>,
) -> Result<Json<SelectionView>, AppError> {
    apply(&app, ReservationAction::SetCustomer { customer }).await
}

/// Book the selected seats for the selected showing and current customer.
///
/// # Errors
///
/// 400 without a showing or customer; otherwise as `POST /api/bookings`.
pub async fn checkout(State(app): State<AppState>) -> Result<(StatusCode, Json<Vec<Booking>>), AppError> {
    let bookings = command(&app, ReservationAction::Checkout, created_bookings).await?;

    Ok((StatusCode::CREATED, Json(bookings)))
}
