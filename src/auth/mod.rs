//! Registration, log in and log out, and the session cookie that ties them together.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register_user;
mod token;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, get_token_from_cookies};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::PasswordHash;
pub use register_user::{get_register_page, register_user};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
