use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error, Username, endpoints,
    expense::{edit_endpoint::parse_expense_id, state::ExpenseState},
};

/// A route handler for deleting an expense, redirects to the dashboard on success.
///
/// Responds with a plain text 404 error if the expense does not exist or
/// belongs to another user.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
    Path(raw_id): Path<String>,
) -> Response {
    let result =
        parse_expense_id(&raw_id).and_then(|id| state.store.delete_expense(&username, id));

    match result {
        Ok(()) => {
            tracing::info!("Deleted expense {raw_id} for {username}");
            Redirect::to(endpoints::DASHBOARD).into_response()
        }
        Err(Error::NotFound) => (StatusCode::NOT_FOUND, "Expense not found").into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {raw_id}: {error}");
            error.into_response()
        }
    }
}
