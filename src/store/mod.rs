//! Contains the trait and implementations for objects that store accounts and expenses.

mod csv_store;
mod export;
mod memory;

use std::sync::Arc;

use time::Date;

use crate::{
    Account, Error, PasswordHash, Username,
    expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense},
};

pub use csv_store::CsvRecordStore;
pub use export::export_csv;
pub use memory::InMemoryRecordStore;

/// A record store shared between request handlers.
pub type SharedStore = Arc<dyn RecordStore>;

/// Handles the creation, retrieval and modification of accounts and expenses.
///
/// Implementations must make each method atomic with respect to the other
/// methods: a read-modify-write such as [RecordStore::replace_expense] must not
/// lose an expense appended concurrently.
pub trait RecordStore: Send + Sync {
    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateAccount] if `username` is already registered.
    fn create_account(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<Account, Error>;

    /// Get the account registered as `username`.
    ///
    /// Returns [Error::NotFound] if no such account exists.
    fn get_account(&self, username: &Username) -> Result<Account, Error>;

    /// Get the number of registered accounts.
    fn count_accounts(&self) -> Result<usize, Error>;

    /// Record a new expense and assign it an ID.
    fn append_expense(&self, expense: NewExpense) -> Result<Expense, Error>;

    /// Get the expenses of `owner` dated within `date_range`, in the order they were recorded.
    ///
    /// Records that cannot be parsed are logged and skipped.
    fn list_expenses(&self, owner: &Username, date_range: DateRange)
    -> Result<Vec<Expense>, Error>;

    /// Get a single expense belonging to `owner`.
    ///
    /// Returns [Error::NotFound] if `id` does not exist or belongs to another user.
    fn get_expense(&self, owner: &Username, id: ExpenseId) -> Result<Expense, Error> {
        self.list_expenses(owner, DateRange::default())?
            .into_iter()
            .find(|expense| expense.id == id)
            .ok_or(Error::NotFound)
    }

    /// Overwrite the editable fields of an expense belonging to `owner`.
    ///
    /// Returns [Error::NotFound] if `id` does not exist or belongs to another user.
    fn replace_expense(
        &self,
        owner: &Username,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, Error>;

    /// Delete an expense belonging to `owner`.
    ///
    /// Returns [Error::NotFound] if `id` does not exist or belongs to another user.
    fn delete_expense(&self, owner: &Username, id: ExpenseId) -> Result<(), Error>;
}

/// An inclusive date range, where either end may be left open.
///
/// The default range includes every date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// The earliest date to include.
    pub start: Option<Date>,
    /// The latest date to include.
    pub end: Option<Date>,
}

impl DateRange {
    /// Create a range from optional bounds.
    pub fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }

    /// Whether the range has no bounds.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Check `raw_password` against the account registered as `raw_username`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidCredentials] if the username is unknown or the password is wrong,
/// - or any error returned by `store`.
pub fn verify_credentials(
    store: &dyn RecordStore,
    raw_username: &str,
    raw_password: &str,
) -> Result<Account, Error> {
    let username = Username::new(raw_username).map_err(|_| Error::InvalidCredentials)?;

    let account = match store.get_account(&username) {
        Ok(account) => account,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match account.password_hash.verify(raw_password) {
        Ok(true) => Ok(account),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => {
            tracing::warn!("Could not verify the stored password for {username}: {error}");
            Err(Error::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod date_range_tests {
    use time::macros::date;

    use super::DateRange;

    #[test]
    fn default_range_contains_everything() {
        let range = DateRange::default();

        assert!(range.is_unbounded());
        assert!(range.contains(date!(1970 - 01 - 01)));
        assert!(range.contains(date!(2999 - 12 - 31)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::new(Some(date!(2024 - 01 - 10)), Some(date!(2024 - 01 - 31)));

        assert!(range.contains(date!(2024 - 01 - 10)));
        assert!(range.contains(date!(2024 - 01 - 31)));
        assert!(!range.contains(date!(2024 - 01 - 09)));
        assert!(!range.contains(date!(2024 - 02 - 01)));
    }

    #[test]
    fn open_start() {
        let range = DateRange::new(None, Some(date!(2024 - 01 - 31)));

        assert!(range.contains(date!(1999 - 01 - 01)));
        assert!(!range.contains(date!(2024 - 02 - 01)));
    }
}

#[cfg(test)]
mod verify_credentials_tests {
    use crate::{
        Error, PasswordHash, Username,
        store::{InMemoryRecordStore, RecordStore, verify_credentials},
    };

    fn store_with_alice() -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        store
            .create_account(
                Username::new_unchecked("alice"),
                PasswordHash::from_raw_password("correct horse", 4).unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn succeeds_with_correct_password() {
        let store = store_with_alice();

        let account = verify_credentials(&store, "alice", "correct horse").unwrap();

        assert_eq!(account.username.as_str(), "alice");
    }

    #[test]
    fn fails_with_wrong_password() {
        let store = store_with_alice();

        assert_eq!(
            verify_credentials(&store, "alice", "battery staple"),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn fails_with_unknown_username() {
        let store = store_with_alice();

        assert_eq!(
            verify_credentials(&store, "bob", "correct horse"),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn fails_when_stored_password_is_not_a_hash() {
        let store = InMemoryRecordStore::new();
        store
            .create_account(
                Username::new_unchecked("carol"),
                PasswordHash::new_unchecked("plaintext"),
            )
            .unwrap();

        assert_eq!(
            verify_credentials(&store, "carol", "plaintext"),
            Err(Error::InvalidCredentials)
        );
    }
}
