//! Endpoints for fetching and editing a single expense.

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error, Username, endpoints,
    expense::{
        ExpenseId, ExpenseUpdate,
        core::{parse_amount, parse_date},
        state::ExpenseState,
    },
};

const EXPENSE_NOT_FOUND_MSG: &str = "Expense not found";

/// Parse an expense ID taken from the URL path.
///
/// An ID that cannot be parsed cannot exist, so it is treated the same as a
/// missing expense.
pub(super) fn parse_expense_id(raw_id: &str) -> Result<ExpenseId, Error> {
    raw_id.parse().map_err(|error| {
        tracing::info!("Invalid expense ID {raw_id:?}: {error}");
        Error::NotFound
    })
}

/// A route handler that responds with the expense as JSON.
///
/// Used to fill in the edit dialog on the dashboard. Responds with a 404
/// JSON error if the expense does not exist or belongs to another user.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
    Path(raw_id): Path<String>,
) -> Response {
    let expense = parse_expense_id(&raw_id).and_then(|id| state.store.get_expense(&username, id));

    match expense {
        Ok(expense) => Json(expense).into_response(),
        Err(Error::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": EXPENSE_NOT_FOUND_MSG })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not get expense {raw_id}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An unexpected error occurred" })),
            )
                .into_response()
        }
    }
}

/// The form data for editing an expense.
#[derive(Debug, Deserialize)]
pub struct EditExpenseForm {
    /// When the money was spent, as YYYY-MM-DD.
    pub date: String,
    /// The category of the expense.
    pub category: String,
    /// The amount spent in dollars.
    pub amount: String,
    /// Text detailing the expense.
    #[serde(default)]
    pub description: String,
}

impl EditExpenseForm {
    fn into_update(self) -> Result<ExpenseUpdate, &'static str> {
        let date = parse_date(&self.date).map_err(|_| "Invalid date. Please use YYYY-MM-DD.")?;
        let amount =
            parse_amount(&self.amount).map_err(|_| "Invalid amount. Please enter a number.")?;

        Ok(ExpenseUpdate {
            date,
            category: self.category.trim().to_owned(),
            amount,
            description: self.description.trim().to_owned(),
        })
    }
}

/// A route handler for editing an expense, redirects to the dashboard on success.
///
/// Responds with a plain text 400 error for an invalid date or amount, and a
/// plain text 404 error if the expense does not exist or belongs to another user.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
    Path(raw_id): Path<String>,
    Form(form): Form<EditExpenseForm>,
) -> Response {
    let Ok(id) = parse_expense_id(&raw_id) else {
        return (StatusCode::NOT_FOUND, EXPENSE_NOT_FOUND_MSG).into_response();
    };

    let update = match form.into_update() {
        Ok(update) => update,
        Err(message) => {
            tracing::info!("Rejected edit of expense {id}: {message}");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    match state.store.replace_expense(&username, id, update) {
        Ok(expense) => {
            tracing::info!("Updated expense {} for {}", expense.id, expense.owner);
            Redirect::to(endpoints::DASHBOARD).into_response()
        }
        Err(Error::NotFound) => (StatusCode::NOT_FOUND, EXPENSE_NOT_FOUND_MSG).into_response(),
        Err(error) => {
            tracing::error!("Could not update expense {id}: {error}");
            error.into_response()
        }
    }
}
