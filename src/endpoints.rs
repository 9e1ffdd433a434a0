//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit/{expense_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The route for the registration page and form.
pub const REGISTER: &str = "/register";
/// The route for the log in page and form.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The landing page for logged in users, also the target of the add expense form.
pub const DASHBOARD: &str = "/dashboard";
/// The route to fetch an expense as JSON or submit edits to it.
pub const EDIT_EXPENSE: &str = "/edit/{expense_id}";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/delete/{expense_id}";
/// The route to set the budget for the current session.
pub const SET_BUDGET: &str = "/set_budget";
/// The route to download a user's expenses as a CSV file.
pub const DOWNLOAD: &str = "/download";
/// The read-only page listing all of a user's expenses.
pub const VIEW_EXPENSES: &str = "/view_expenses";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path contains a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::{ExpenseId, endpoints};

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD);
        assert_endpoint_is_valid_uri(endpoints::SET_BUDGET);
        assert_endpoint_is_valid_uri(endpoints::DOWNLOAD);
        assert_endpoint_is_valid_uri(endpoints::VIEW_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
    }

    #[test]
    fn formatted_expense_endpoints_are_valid_uris() {
        let id = ExpenseId::generate();

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EDIT_EXPENSE, id));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_EXPENSE, id));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", "abc");

        assert_eq!(formatted_path, "/hello/abc/bye");
    }
}
