//! Keeps the user's budget in a private session cookie.
//!
//! The budget is never written to the store. It lasts until the browser
//! session ends or the user logs out.

use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::{Error, endpoints};

pub(crate) const COOKIE_BUDGET: &str = "budget";

/// Store `budget` in a session cookie.
pub(crate) fn set_budget_cookie(jar: PrivateCookieJar, budget: f64) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_BUDGET, budget.to_string()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Expire the budget cookie on the client side.
pub(crate) fn invalidate_budget_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_BUDGET, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the budget stored in `jar`, if one has been set.
///
/// A cookie that does not hold a valid budget is treated as unset.
pub(crate) fn get_budget_from_cookies(jar: &PrivateCookieJar) -> Option<f64> {
    let cookie = jar.get(COOKIE_BUDGET)?;

    match parse_budget(cookie.value_trimmed()) {
        Ok(budget) => Some(budget),
        Err(error) => {
            tracing::warn!("Ignoring budget cookie: {error}");
            None
        }
    }
}

/// Parse a non-negative, finite budget.
fn parse_budget(raw_budget: &str) -> Result<f64, Error> {
    match raw_budget.trim().parse::<f64>() {
        Ok(budget) if budget.is_finite() && budget >= 0.0 => Ok(budget),
        _ => Err(Error::InvalidAmount(raw_budget.to_owned())),
    }
}

/// The form data for setting the budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The budget in dollars, as entered by the user.
    pub budget: String,
}

/// A route handler for setting the session budget, redirects to the dashboard on success.
///
/// Responds with a plain text 400 error if the budget is not a non-negative number.
pub async fn set_budget_endpoint(jar: PrivateCookieJar, Form(form): Form<BudgetForm>) -> Response {
    let budget = match parse_budget(&form.budget) {
        Ok(budget) => budget,
        Err(error) => {
            tracing::info!("Rejected budget: {error}");
            return (
                StatusCode::BAD_REQUEST,
                "Invalid budget. Please enter a number that is zero or greater.",
            )
                .into_response();
        }
    };

    (
        set_budget_cookie(jar, budget),
        Redirect::to(endpoints::DASHBOARD),
    )
        .into_response()
}
