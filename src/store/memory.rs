//! A record store that keeps everything in memory.

use std::sync::{Mutex, MutexGuard};

use crate::{
    Account, Error, PasswordHash, Username,
    expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense},
    store::{DateRange, RecordStore},
};

#[derive(Debug, Default)]
struct Records {
    accounts: Vec<Account>,
    expenses: Vec<Expense>,
}

/// Stores accounts and expenses in memory.
///
/// Nothing is persisted, so all data is lost when the store is dropped.
/// Useful for tests and for trying out the app.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, Error> {
        self.records.lock().map_err(|error| {
            tracing::error!("Could not acquire the store lock: {error}");
            Error::StoreLockError
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create_account(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<Account, Error> {
        let mut records = self.lock()?;

        if records
            .accounts
            .iter()
            .any(|account| account.username == username)
        {
            return Err(Error::DuplicateAccount(username.to_string()));
        }

        let account = Account::new(username, password_hash);
        records.accounts.push(account.clone());

        Ok(account)
    }

    fn get_account(&self, username: &Username) -> Result<Account, Error> {
        self.lock()?
            .accounts
            .iter()
            .find(|account| &account.username == username)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn count_accounts(&self) -> Result<usize, Error> {
        Ok(self.lock()?.accounts.len())
    }

    fn append_expense(&self, expense: NewExpense) -> Result<Expense, Error> {
        let expense = expense.into_expense(ExpenseId::generate());
        self.lock()?.expenses.push(expense.clone());

        Ok(expense)
    }

    fn list_expenses(
        &self,
        owner: &Username,
        date_range: DateRange,
    ) -> Result<Vec<Expense>, Error> {
        Ok(self
            .lock()?
            .expenses
            .iter()
            .filter(|expense| &expense.owner == owner && date_range.contains(expense.date))
            .cloned()
            .collect())
    }

    fn replace_expense(
        &self,
        owner: &Username,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, Error> {
        let mut records = self.lock()?;

        let expense = records
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id && &expense.owner == owner)
            .ok_or(Error::NotFound)?;
        update.apply_to(expense);

        Ok(expense.clone())
    }

    fn delete_expense(&self, owner: &Username, id: ExpenseId) -> Result<(), Error> {
        let mut records = self.lock()?;

        let position = records
            .expenses
            .iter()
            .position(|expense| expense.id == id && &expense.owner == owner)
            .ok_or(Error::NotFound)?;
        records.expenses.remove(position);

        Ok(())
    }
}
