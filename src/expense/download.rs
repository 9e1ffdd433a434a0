use axum::{
    Extension,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{Username, expense::state::ExpenseState, store::export_csv};

/// A route handler that responds with all of the user's expenses as a CSV attachment.
pub async fn download_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
) -> Response {
    match export_csv(state.store.as_ref(), &username) {
        Ok(csv) => (
            [
                (CONTENT_TYPE, "text/csv; charset=utf-8"),
                (CONTENT_DISPOSITION, "attachment; filename=\"expenses.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not export expenses for {username}: {error}");
            error.into_response()
        }
    }
}
