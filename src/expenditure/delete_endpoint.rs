//! Defines the endpoint for deleting an expenditure.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenditureId,
    endpoints::{self, format_endpoint},
    expenditure::delete_expenditure,
    user::UserID,
};

/// The state needed to delete an expenditure.
#[derive(Debug, Clone)]
pub struct DeleteExpenditureState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenditureState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the logged in user's expenditures,
/// redirects to the user's dashboard on success.
///
/// Responds with 404 if the expenditure does not exist and 403 if it belongs
/// to another user.
pub async fn delete_expenditure_endpoint(
    State(state): State<DeleteExpenditureState>,
    Extension(user_id): Extension<UserID>,
    Path(expenditure_id): Path<ExpenditureId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_expenditure(expenditure_id, user_id, &connection) {
        Ok(()) => {
            Redirect::to(&format_endpoint(endpoints::DASHBOARD_VIEW, user_id)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
