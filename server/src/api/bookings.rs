//! Booking endpoints.
//!
//! - GET /api/bookings?movie=&status=&startDate=&endDate= - Booking history, optionally filtered
//! - GET /api/bookings/:id - One booking
//! - GET /api/bookings/customer/:customer_id - Active bookings of a customer
//! - GET /api/bookings/billboard/:billboard_id - Active bookings of a showing
//! - GET /api/bookings/dateRange?startDate=&endDate= - Active bookings made in a range
//! - POST /api/bookings - Book seats for a showing
//! - PUT /api/bookings/:id/cancel - Cancel a booking

use super::{command, execute, query, DateRange};
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery, CorrelationId};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinereservas::{
    BillboardId, Booking, BookingFilter, BookingId, Created, CustomerId, ReservationAction,
    ReservationState, SeatId,
};
use serde::Deserialize;

/// Request to book one or more seats of a showing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Showing to book
    pub billboard_id: BillboardId,
    /// Seats to book, one booking each
    pub seat_ids: Vec<SeatId>,
    /// Who is booking
    pub customer_id: CustomerId,
}

fn owned(bookings: Vec<&Booking>) -> Vec<Booking> {
    bookings.into_iter().cloned().collect()
}

/// Bookings made by the command that just ran
pub(crate) fn created_bookings(state: &ReservationState) -> Option<Vec<Booking>> {
    match &state.last_created {
        Some(Created::Bookings(ids)) => Some(
            ids.iter()
                .filter_map(|id| state.bookings.get(id))
                .cloned()
                .collect(),
        ),
        _ => None,
    }
}

/// Booking history, narrowed by the optional filters.
///
/// Malformed filter values are rejected by the extractor with 400.
pub async fn list_bookings(
    State(app): State<AppState>,
    ApiQuery(filter): ApiQuery<BookingFilter>,
) -> Json<Vec<Booking>> {
    Json(app.store.state(|s| owned(s.filter_bookings(&filter))).await)
}

/// Get one booking.
///
/// # Errors
///
/// 404 if the booking does not exist.
pub async fn get_booking(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Booking>, AppError> {
    let booking = query(&app, |s| s.booking(BookingId::new(id)).cloned()).await?;
    Ok(Json(booking))
}

/// Active bookings of a customer.
///
/// # Errors
///
/// 404 for an unknown customer.
pub async fn bookings_by_customer(
    State(app): State<AppState>,
    ApiPath(customer_id): ApiPath<u32>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = query(&app, |s| {
        s.bookings_by_customer(CustomerId::new(customer_id))
            .map(owned)
    })
    .await?;
    Ok(Json(bookings))
}

/// Active bookings of a showing.
///
/// # Errors
///
/// 404 for an unknown or cancelled showing.
pub async fn bookings_by_billboard(
    State(app): State<AppState>,
    ApiPath(billboard_id): ApiPath<u32>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = query(&app, |s| {
        s.bookings_by_billboard(BillboardId::new(billboard_id))
            .map(owned)
    })
    .await?;
    Ok(Json(bookings))
}

/// Active bookings made between two dates.
///
/// # Errors
///
/// 400 for an inverted range.
pub async fn bookings_between(
    State(app): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = query(&app, |s| {
        s.bookings_between(range.start_date, range.end_date)
            .map(owned)
    })
    .await?;
    Ok(Json(bookings))
}

/// Book seats for a showing, one booking per seat, all or nothing.
///
/// # Errors
///
/// 404 for an unknown showing, customer or seat; 400 for an empty or
/// duplicated seat list or a seat in another room; 409 if a seat is taken.
pub async fn create_booking(
    State(app): State<AppState>,
    CorrelationId(correlation_id): CorrelationId,
    ApiJson(request): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Vec<Booking>>), AppError> {
    tracing::info!(
        correlation_id = %correlation_id,
        billboard = %request.billboard_id,
        customer = %request.customer_id,
        seats = request.seat_ids.len(),
        "Booking requested"
    );

    let action = ReservationAction::CreateBooking {
        billboard_id: request.billboard_id,
        seat_ids: request.seat_ids,
        customer_id: request.customer_id,
    };
    let bookings = command(&app, action, created_bookings).await?;

    Ok((StatusCode::CREATED, Json(bookings)))
}

/// Cancel a booking and free its seat.
///
/// # Errors
///
/// 404 for an unknown or already cancelled booking.
pub async fn cancel_booking(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::CancelBooking {
            booking_id: BookingId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
