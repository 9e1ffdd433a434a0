//! Log-out route handler that invalidates the session cookies and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_auth_cookie, endpoints, expense::invalidate_budget_cookie};

/// Invalidate the session and budget cookies and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_budget_cookie(invalidate_auth_cookie(jar));

    (jar, Redirect::to(endpoints::LOG_IN)).into_response()
}
