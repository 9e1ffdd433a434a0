//! This file defines the type that salts and hashes passwords before they are stored.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `raw_password` with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::EmptyField] if `raw_password` is empty,
    /// - or [Error::HashingError] if the password could not be hashed.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        if raw_password.is_empty() {
            return Err(Error::EmptyField("password"));
        }

        hash(raw_password, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::{Error, PasswordHash};

    // The minimum cost bcrypt accepts, keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::from_raw_password("hunter2", TEST_COST).unwrap();

        assert!(hash.verify("hunter2").unwrap());
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::from_raw_password("hunter2", TEST_COST).unwrap();

        assert!(!hash.verify("hunter3").unwrap());
    }

    #[test]
    fn hash_is_not_the_raw_password() {
        let hash = PasswordHash::from_raw_password("hunter2", TEST_COST).unwrap();

        assert_ne!(hash.to_string(), "hunter2");
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(
            PasswordHash::from_raw_password("", TEST_COST),
            Err(Error::EmptyField("password"))
        );
    }
}
