//! Defines the endpoint for looking up where a tracked shipment is.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, expenditure::get_expenditure_by_tracking_number, tracking::TrackingClient,
    user::UserID,
};

/// The state needed to look up a shipment.
#[derive(Debug, Clone)]
pub struct TrackingState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub tracking_client: TrackingClient,
}

impl FromRef<AppState> for TrackingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            tracking_client: state.tracking_client.clone(),
        }
    }
}

/// Find the carrier the logged in user recorded for `tracking_num`.
fn get_carrier(
    user_id: UserID,
    tracking_num: &str,
    db_connection: &Mutex<Connection>,
) -> Result<String, Error> {
    let connection = db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expenditure = get_expenditure_by_tracking_number(user_id, tracking_num, &connection)?;

    expenditure.tracking_num_carrier.ok_or(Error::NotFound)
}

/// A route handler that responds with the last known location of one of the
/// logged in user's shipments as JSON.
///
/// Responds with 404 if the user has no expenditure with the tracking number
/// or it has no carrier, and 502 if the tracking API fails.
pub async fn tracking_endpoint(
    State(state): State<TrackingState>,
    Extension(user_id): Extension<UserID>,
    Path(tracking_num): Path<String>,
) -> Response {
    let carrier = match get_carrier(user_id, &tracking_num, &state.db_connection) {
        Ok(carrier) => carrier,
        Err(error) => return error.into_json_response(),
    };

    match state.tracking_client.locate(&carrier, &tracking_num).await {
        Ok(location) => Json(location).into_response(),
        Err(error) => {
            tracing::warn!("Tracking lookup for {tracking_num} failed: {error}");
            error.into_json_response()
        }
    }
}
