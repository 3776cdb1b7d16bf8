//! Catalog loading, lineup generation and booking restore.

use super::Effects;
use crate::actions::ReservationAction;
use crate::catalog::CatalogSnapshot;
use crate::environment::ReservationEnvironment;
use crate::error::ReservationError;
use crate::schedule;
use crate::state::ReservationState;
use crate::types::{Booking, Movie, Room};
use chrono::NaiveDate;
use cinereservas_core::{effect::Effect, smallvec, SmallVec};

pub(super) fn load_catalog(env: &ReservationEnvironment) -> Effects {
    let catalog = env.catalog.clone();
    smallvec![Effect::future(async move {
        Some(match catalog.load().await {
            Ok(snapshot) => ReservationAction::CatalogLoaded { snapshot },
            Err(error) => ReservationAction::CatalogLoadFailed {
                error: error.to_string(),
            },
        })
    })]
}

pub(super) fn catalog_loaded(state: &mut ReservationState, snapshot: CatalogSnapshot) -> Effects {
    tracing::info!(
        movies = snapshot.movies.len(),
        rooms = snapshot.rooms.len(),
        seats = snapshot.seats.len(),
        customers = snapshot.customers.len(),
        "Catalog loaded"
    );

    state.movies = snapshot.movies.into_iter().map(|m| (m.id, m)).collect();
    state.rooms = snapshot.rooms.into_iter().map(|r| (r.id, r)).collect();
    state.seats = snapshot.seats.into_iter().map(|s| (s.id, s)).collect();
    state.customers = snapshot.customers.into_iter().map(|c| (c.id, c)).collect();
    state.catalog_loaded = true;

    state.occupy_booked_seats();
    state.prune_selection();
    SmallVec::new()
}

pub(super) fn catalog_load_failed(state: &mut ReservationState, error: String) -> Effects {
    tracing::error!(error = %error, "Catalog load failed");
    state.last_error = Some(ReservationError::Storage(error));
    SmallVec::new()
}

pub(super) fn load_billboards(state: &mut ReservationState, date: NaiveDate) -> Effects {
    if state.has_billboards_on(date) {
        return SmallVec::new();
    }

    let movies: Vec<Movie> = state.active_movies().into_iter().cloned().collect();
    let rooms: Vec<Room> = state.active_rooms().into_iter().cloned().collect();
    let lineup = schedule::daily_lineup(date, &movies, &rooms, state.next_billboard_id());

    tracing::info!(%date, showings = lineup.len(), "Generated default lineup");
    state
        .billboards
        .extend(lineup.into_iter().map(|b| (b.id, b)));
    SmallVec::new()
}

pub(super) fn restore_bookings(env: &ReservationEnvironment) -> Effects {
    let storage = env.storage.clone();
    smallvec![Effect::future(async move {
        Some(match storage.load().await {
            Ok(bookings) => ReservationAction::BookingsRestored { bookings },
            Err(error) => ReservationAction::PersistenceFailed {
                error: error.to_string(),
            },
        })
    })]
}

pub(super) fn bookings_restored(state: &mut ReservationState, bookings: Vec<Booking>) -> Effects {
    tracing::info!(bookings = bookings.len(), "Bookings restored");
    state.bookings = bookings.into_iter().map(|b| (b.id, b)).collect();
    state.occupy_booked_seats();
    state.prune_selection();
    SmallVec::new()
}

pub(super) fn persistence_failed(state: &mut ReservationState, error: String) -> Effects {
    tracing::error!(error = %error, "Booking persistence failed");
    state.last_error = Some(ReservationError::Storage(error));
    SmallVec::new()
}
