//! Defines the account model and the username newtype that identifies its owner.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for usernames.
///
/// This helps disambiguate usernames from other strings such as categories and
/// descriptions, leading to better compile time errors.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a username from user input.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyField] if the trimmed string is empty.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let trimmed = raw_username.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyField("username"));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure that `raw_username` comes from a trusted
    /// source, such as the account file.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The caller should ensure that `username` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The unique name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

impl Account {
    /// Create a new account.
    pub fn new(username: Username, password_hash: PasswordHash) -> Self {
        Self {
            username,
            password_hash,
        }
    }
}
