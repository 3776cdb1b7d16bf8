//! Router configuration.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{billboards, bookings, customers, movies, rooms, seats, selection};
use crate::middleware::correlation_id_layer;
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router: `/health`, `/ready` and the API under `/api`.
pub fn build_router(state: AppState, cors_allow_origin: &str) -> Router {
    let api_routes = Router::new()
        // Movies
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route("/movies/genre/:genre", get(movies::movies_by_genre))
        .route(
            "/movies/:id",
            get(movies::get_movie)
                .put(movies::update_movie)
                .delete(movies::delete_movie),
        )
        // Rooms
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/number/:number", get(rooms::room_by_number))
        .route(
            "/rooms/:id",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        // Seats
        .route("/seats", post(seats::create_seat))
        .route("/seats/room/:room_id", get(seats::seats_by_room))
        .route("/seats/room/:room_id/position", get(seats::seat_by_position))
        .route(
            "/seats/:id",
            get(seats::get_seat)
                .put(seats::update_seat)
                .delete(seats::delete_seat),
        )
        .route("/seats/:id/enable", put(seats::enable_seat))
        .route("/seats/:id/disable", put(seats::disable_seat))
        .route("/seats/:id/toggle", put(seats::toggle_seat))
        // Billboards
        .route("/billboards", post(billboards::create_billboard))
        .route("/billboards/date/:date", get(billboards::billboards_by_date))
        .route("/billboards/dateRange", get(billboards::billboards_between))
        .route(
            "/billboards/room/:room_id/date/:date",
            get(billboards::billboards_by_room_and_date),
        )
        .route(
            "/billboards/movie/:movie_id/dateRange",
            get(billboards::billboards_by_movie),
        )
        .route(
            "/billboards/genre/:genre/dateRange",
            get(billboards::billboards_by_genre),
        )
        .route(
            "/billboards/seatsAvailability/date/:date",
            get(billboards::seats_availability),
        )
        .route(
            "/billboards/:id",
            get(billboards::get_billboard)
                .put(billboards::update_billboard)
                .delete(billboards::delete_billboard),
        )
        .route("/billboards/:id/cancel", put(billboards::cancel_billboard))
        // Customers
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/document/:document",
            get(customers::customer_by_document),
        )
        .route("/customers/email/:email", get(customers::customer_by_email))
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Bookings
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/dateRange", get(bookings::bookings_between))
        .route(
            "/bookings/customer/:customer_id",
            get(bookings::bookings_by_customer),
        )
        .route(
            "/bookings/billboard/:billboard_id",
            get(bookings::bookings_by_billboard),
        )
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/cancel", put(bookings::cancel_booking))
        // Kiosk session
        .route("/selection", get(selection::get_selection))
        .route("/selection/movie", put(selection::select_movie))
        .route("/selection/billboard", put(selection::select_billboard))
        .route(
            "/selection/seats/:seat_id/toggle",
            post(selection::toggle_seat),
        )
        .route("/selection/customer", put(selection::set_customer))
        .route("/selection/checkout", post(selection::checkout));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(cors_layer(cors_allow_origin))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}

fn cors_layer(allow_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allow_origin.trim() == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(allow_origin.trim()) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(origin = allow_origin, "Invalid CORS origin, allowing any");
            layer.allow_origin(Any)
        },
    }
}
