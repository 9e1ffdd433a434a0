//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::State,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState,
    auth::{
        AuthState, auth_guard, get_log_in_page, get_log_out, get_register_page,
        get_token_from_cookies, post_log_in, register_user,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, download_expenses_endpoint,
        edit_expense_endpoint, get_dashboard_page, get_expense_endpoint, get_expenses_page,
        set_budget_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(register_user),
        )
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(
            endpoints::DASHBOARD,
            get(get_dashboard_page).post(create_expense_endpoint),
        )
        .route(
            endpoints::EDIT_EXPENSE,
            get(get_expense_endpoint).post(edit_expense_endpoint),
        )
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route(endpoints::SET_BUDGET, post(set_budget_endpoint))
        .route(endpoints::DOWNLOAD, get(download_expenses_endpoint))
        .route(endpoints::VIEW_EXPENSES, get(get_expenses_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page if the client has a
/// valid session, otherwise to the log-in page.
async fn get_index_page(State(state): State<AuthState>, jar: PrivateCookieJar) -> Response {
    let has_session = get_token_from_cookies(&jar)
        .is_ok_and(|token| state.store.get_account(&token.username).is_ok());

    if has_session {
        Redirect::to(endpoints::DASHBOARD).into_response()
    } else {
        Redirect::to(endpoints::LOG_IN).into_response()
    }
}
