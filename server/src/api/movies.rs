//! Movie endpoints.
//!
//! - GET /api/movies - Active movies
//! - GET /api/movies/:id - One movie
//! - GET /api/movies/genre/:genre - Active movies of a genre
//! - POST /api/movies - Add a movie
//! - PUT /api/movies/:id - Replace a movie's fields
//! - DELETE /api/movies/:id - Soft-delete a movie

use super::{command, execute, query};
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinereservas::{Created, Movie, MovieDraft, MovieGenre, MovieId, ReservationAction};

/// List active movies.
pub async fn list_movies(State(app): State<AppState>) -> Json<Vec<Movie>> {
    Json(
        app.store
            .state(|s| s.active_movies().into_iter().cloned().collect())
            .await,
    )
}

/// Get one movie.
///
/// # Errors
///
/// 404 if the movie is missing or deleted.
pub async fn get_movie(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<Movie>, AppError> {
    let movie = query(&app, |s| s.movie(MovieId::new(id)).cloned()).await?;
    Ok(Json(movie))
}

/// List active movies of a genre.
///
/// # Errors
///
/// 400 for an unknown genre.
pub async fn movies_by_genre(
    State(app): State<AppState>,
    ApiPath(genre): ApiPath<String>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let genre: MovieGenre = genre.parse()?;
    Ok(Json(
        app.store
            .state(|s| s.movies_by_genre(genre).into_iter().cloned().collect())
            .await,
    ))
}

/// Add a movie.
///
/// # Errors
///
/// 400 for invalid fields.
pub async fn create_movie(
    State(app): State<AppState>,
    ApiJson(draft): ApiJson<MovieDraft>,
) -> Result<(StatusCode, Json<Movie>), AppError> {
    let movie = command(&app, ReservationAction::CreateMovie { draft }, |s| {
        match s.last_created {
            Some(Created::Movie(id)) => s.movies.get(&id).cloned(),
            _ => None,
        }
    })
    .await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Replace a movie's fields.
///
/// # Errors
///
/// 404 if the movie is missing, 400 for invalid fields.
pub async fn update_movie(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
    ApiJson(draft): ApiJson<MovieDraft>,
) -> Result<Json<Movie>, AppError> {
    let movie_id = MovieId::new(id);
    let movie = command(&app, ReservationAction::UpdateMovie { movie_id, draft }, |s| {
        s.movies.get(&movie_id).cloned()
    })
    .await?;

    Ok(Json(movie))
}

/// Soft-delete a movie.
///
/// # Errors
///
/// 404 if the movie is missing or already deleted.
pub async fn delete_movie(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, AppError> {
    execute(
        &app,
        ReservationAction::DeleteMovie {
            movie_id: MovieId::new(id),
        },
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
