use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{AppState, store::SharedStore};

/// The state needed by the expense pages and endpoints.
#[derive(Clone)]
pub struct ExpenseState {
    /// The store holding the expenses.
    pub store: SharedStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The key for the private cookie holding the session budget.
    pub cookie_key: Key,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ExpenseState> for Key {
    fn from_ref(state: &ExpenseState) -> Self {
        state.cookie_key.clone()
    }
}
