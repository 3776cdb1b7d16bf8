//! REST endpoints under `/api`.
//!
//! Queries read the state through [`Store::state`](cinereservas_core::store::Store::state).
//! Commands go through [`command`], which sends the action and reads the
//! outcome under the same lock, so a concurrent request can never swap in its
//! own `last_error` or `last_created`.

pub mod billboards;
pub mod bookings;
pub mod customers;
pub mod movies;
pub mod rooms;
pub mod seats;
pub mod selection;

use crate::error::AppError;
use crate::server::AppState;
use chrono::NaiveDate;
use cinereservas::{ReservationAction, ReservationError, ReservationState};
use serde::Deserialize;

/// Send `action`; on success return `read` applied to the resulting state.
///
/// Waits for the action's effects (booking persistence) before returning.
pub(crate) async fn command<T, F>(
    app: &AppState,
    action: ReservationAction,
    read: F,
) -> Result<T, AppError>
where
    F: FnOnce(&ReservationState) -> Option<T> + Send,
    T: Send,
{
    let name = action.name();
    let (outcome, handle) = app
        .store
        .send_with(action, |state| match &state.last_error {
            Some(error) => Err(error.clone()),
            None => Ok(read(state)),
        })
        .await?;

    handle.wait_with_timeout(app.effect_timeout).await?;

    outcome?.ok_or_else(|| {
        AppError::internal("Command produced no result")
            .with_source(anyhow::anyhow!("{name} accepted without the expected record"))
    })
}

/// Send `action` and discard its result
pub(crate) async fn execute(app: &AppState, action: ReservationAction) -> Result<(), AppError> {
    command(app, action, |_| Some(())).await
}

/// Run a fallible read against the current state
pub(crate) async fn query<T, F>(app: &AppState, read: F) -> Result<T, AppError>
where
    F: FnOnce(&ReservationState) -> Result<T, ReservationError> + Send,
    T: Send,
{
    Ok(app.store.state(read).await?)
}

/// `?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day (inclusive)
    pub start_date: NaiveDate,
    /// Last day (inclusive)
    pub end_date: NaiveDate,
}
