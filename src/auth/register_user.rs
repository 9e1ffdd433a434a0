//! The registration page for creating an account.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, Username,
    auth::cookie::set_auth_cookie,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, log_in_register,
        password_input, username_input,
    },
    store::SharedStore,
    timezone::get_local_offset,
};

pub const DUPLICATE_USERNAME_ERROR_MSG: &str = "That username is already taken.";
pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match.";

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

/// Error messages to show next to the fields of the registration form.
#[derive(Default)]
struct RegistrationErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(username: &str, errors: RegistrationErrors) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::REGISTER)
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input(errors.password))
            (confirm_password_input(errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

fn registration_page(username: &str, errors: RegistrationErrors) -> Markup {
    let registration_form = registration_form(username, errors);
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content)
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    registration_page("", RegistrationErrors::default()).into_response()
}

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The store new accounts are added to.
    pub store: SharedStore,
    /// The bcrypt cost used to hash new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            store: state.store.clone(),
            password_hash_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create an account, log the new user in and redirect them to the dashboard.
///
/// The form is shown again with an error message if a field is empty, the
/// passwords do not match or the username is taken.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let rerender = |status: StatusCode, errors: RegistrationErrors| {
        (status, registration_page(&user_data.username, errors)).into_response()
    };

    let username = match Username::new(&user_data.username) {
        Ok(username) => username,
        Err(_) => {
            return rerender(
                StatusCode::BAD_REQUEST,
                RegistrationErrors {
                    username: Some("Username cannot be empty."),
                    ..Default::default()
                },
            );
        }
    };

    if user_data.password != user_data.confirm_password {
        return rerender(
            StatusCode::BAD_REQUEST,
            RegistrationErrors {
                confirm_password: Some(PASSWORD_MISMATCH_ERROR_MSG),
                ..Default::default()
            },
        );
    }

    let password_hash =
        match PasswordHash::from_raw_password(&user_data.password, state.password_hash_cost) {
            Ok(password_hash) => password_hash,
            Err(Error::EmptyField(_)) => {
                return rerender(
                    StatusCode::BAD_REQUEST,
                    RegistrationErrors {
                        password: Some("Password cannot be empty."),
                        ..Default::default()
                    },
                );
            }
            Err(error) => {
                tracing::error!("Could not hash password: {error}");
                return error.into_response();
            }
        };

    let account = match state.store.create_account(username, password_hash) {
        Ok(account) => account,
        Err(Error::DuplicateAccount(username)) => {
            tracing::info!("Rejected registration of existing username \"{username}\"");
            return rerender(
                StatusCode::CONFLICT,
                RegistrationErrors {
                    username: Some(DUPLICATE_USERNAME_ERROR_MSG),
                    ..Default::default()
                },
            );
        }
        Err(error) => {
            tracing::error!("Could not create account: {error}");
            return error.into_response();
        }
    };

    tracing::info!("Registered account \"{}\"", account.username);

    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    match set_auth_cookie(jar, &account.username, state.cookie_duration, local_offset) {
        Ok(jar) => (jar, Redirect::to(endpoints::DASHBOARD)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            Redirect::to(endpoints::LOG_IN).into_response()
        }
    }
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::Arc;

    use axum::{Form, extract::State, http::StatusCode};
    use axum_extra::extract::PrivateCookieJar;

    use crate::{
        InMemoryRecordStore, PasswordHash, RecordStore, Username,
        app_state::create_cookie_key,
        auth::DEFAULT_COOKIE_DURATION,
        endpoints,
        test_utils::{assert_form_error_message, get_header, must_get_form, parse_html_document},
    };

    use super::{
        DUPLICATE_USERNAME_ERROR_MSG, PASSWORD_MISMATCH_ERROR_MSG, RegisterForm,
        RegistrationState, register_user,
    };

    fn get_test_state() -> (Arc<InMemoryRecordStore>, RegistrationState) {
        let store = Arc::new(InMemoryRecordStore::new());
        let state = RegistrationState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: "Etc/UTC".to_owned(),
            store: store.clone(),
            password_hash_cost: 4,
        };

        (store, state)
    }

    fn form(username: &str, password: &str, confirm_password: &str) -> Form<RegisterForm> {
        Form(RegisterForm {
            username: username.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        })
    }

    #[tokio::test]
    async fn register_creates_account_and_logs_in() {
        let (store, state) = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = register_user(State(state), jar, form("alice", "hunter2", "hunter2")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::DASHBOARD);
        assert!(response.headers().get("set-cookie").is_some());
        let account = store.get_account(&Username::new_unchecked("alice")).unwrap();
        assert!(account.password_hash.verify("hunter2").unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (store, state) = get_test_state();
        store
            .create_account(
                Username::new_unchecked("alice"),
                PasswordHash::new_unchecked("hash"),
            )
            .unwrap();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = register_user(State(state), jar, form("alice", "hunter2", "hunter2")).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(store.count_accounts(), Ok(1));
        let document = parse_html_document(response).await;
        assert_form_error_message(&must_get_form(&document), DUPLICATE_USERNAME_ERROR_MSG);
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let (store, state) = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = register_user(State(state), jar, form("alice", "hunter2", "hunter3")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count_accounts(), Ok(0));
        let document = parse_html_document(response).await;
        assert_form_error_message(&must_get_form(&document), PASSWORD_MISMATCH_ERROR_MSG);
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let (store, state) = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = register_user(State(state), jar, form("   ", "hunter2", "hunter2")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count_accounts(), Ok(0));
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let (store, state) = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = register_user(State(state), jar, form("alice", "", "")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.count_accounts(), Ok(0));
    }
}
