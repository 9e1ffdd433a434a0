//! A record store backed by two flat CSV files, one for accounts and one for expenses.
//!
//! Every read scans the whole file and every edit or delete rewrites it. All
//! operations hold a single lock for their whole duration so that concurrent
//! requests cannot interleave their read-modify-write sequences.

use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use csv::{ByteRecord, StringRecord};

use crate::{
    Account, Error, PasswordHash, Username,
    expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense, format_date, parse_date},
    store::{DateRange, RecordStore},
};

/// The name of the file that holds accounts.
pub const USERS_FILE: &str = "users.csv";
/// The name of the file that holds expenses.
pub const EXPENSES_FILE: &str = "expenses.csv";

const USERS_HEADER: [&str; 2] = ["username", "password"];
const EXPENSES_HEADER: [&str; 6] = ["id", "username", "date", "category", "amount", "description"];
/// Expense files written before expenses had IDs.
const LEGACY_EXPENSES_HEADER: [&str; 5] = ["username", "date", "category", "amount", "description"];

/// Stores accounts and expenses in `users.csv` and `expenses.csv`.
///
/// A missing file is treated as an empty store and is created with its
/// header on the first write.
#[derive(Debug)]
pub struct CsvRecordStore {
    users_path: PathBuf,
    expenses_path: PathBuf,
    lock: Mutex<()>,
}

impl CsvRecordStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    ///
    /// Expense files from before expenses had IDs are migrated by giving
    /// every row a new ID.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::Storage] if the directory or files cannot be read or written,
    /// - or [Error::MalformedRecord] if the expense file has an unrecognised header.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;

        let store = Self {
            users_path: data_dir.join(USERS_FILE),
            expenses_path: data_dir.join(EXPENSES_FILE),
            lock: Mutex::new(()),
        };

        store.migrate_legacy_expenses()?;

        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, Error> {
        self.lock.lock().map_err(|error| {
            tracing::error!("Could not acquire the store lock: {error}");
            Error::StoreLockError
        })
    }

    fn migrate_legacy_expenses(&self) -> Result<(), Error> {
        let _guard = self.lock()?;

        let Some((header, records)) = read_records(&self.expenses_path)? else {
            return Ok(());
        };

        if header_matches(&header, &EXPENSES_HEADER) {
            return Ok(());
        }

        if !header_matches(&header, &LEGACY_EXPENSES_HEADER) {
            return Err(Error::MalformedRecord(format!(
                "unexpected header {:?} in {}",
                header,
                self.expenses_path.display()
            )));
        }

        tracing::info!(
            "Adding IDs to {} expenses in {}",
            records.len(),
            self.expenses_path.display()
        );

        let migrated: Vec<ByteRecord> = records
            .iter()
            .map(|record| {
                let mut migrated = ByteRecord::new();
                migrated.push_field(ExpenseId::generate().to_string().as_bytes());
                migrated.extend(record.iter());
                migrated
            })
            .collect();

        write_records(&self.expenses_path, &EXPENSES_HEADER, &migrated)
    }

    fn read_accounts(&self) -> Result<Vec<Account>, Error> {
        let Some((_, records)) = read_records(&self.users_path)? else {
            return Ok(Vec::new());
        };

        let accounts = records
            .iter()
            .filter_map(|record| match parse_account(record) {
                Ok(account) => Some(account),
                Err(error) => {
                    log_skipped_record(&self.users_path, record, &error);
                    None
                }
            })
            .collect();

        Ok(accounts)
    }

    fn read_expense_records(&self) -> Result<Vec<ByteRecord>, Error> {
        Ok(read_records(&self.expenses_path)?
            .map(|(_, records)| records)
            .unwrap_or_default())
    }
}

impl RecordStore for CsvRecordStore {
    fn create_account(
        &self,
        username: Username,
        password_hash: PasswordHash,
    ) -> Result<Account, Error> {
        let _guard = self.lock()?;

        if self
            .read_accounts()?
            .iter()
            .any(|account| account.username == username)
        {
            return Err(Error::DuplicateAccount(username.to_string()));
        }

        append_record(
            &self.users_path,
            &USERS_HEADER,
            &ByteRecord::from(vec![username.as_str(), password_hash.as_ref()]),
        )?;

        Ok(Account::new(username, password_hash))
    }

    fn get_account(&self, username: &Username) -> Result<Account, Error> {
        let _guard = self.lock()?;

        self.read_accounts()?
            .into_iter()
            .find(|account| &account.username == username)
            .ok_or(Error::NotFound)
    }

    fn count_accounts(&self) -> Result<usize, Error> {
        let _guard = self.lock()?;

        Ok(self.read_accounts()?.len())
    }

    fn append_expense(&self, expense: NewExpense) -> Result<Expense, Error> {
        let _guard = self.lock()?;

        let expense = expense.into_expense(ExpenseId::generate());
        append_record(
            &self.expenses_path,
            &EXPENSES_HEADER,
            &expense_to_record(&expense),
        )?;

        Ok(expense)
    }

    fn list_expenses(
        &self,
        owner: &Username,
        date_range: DateRange,
    ) -> Result<Vec<Expense>, Error> {
        let _guard = self.lock()?;

        let expenses = self
            .read_expense_records()?
            .iter()
            .filter_map(|record| match parse_expense(record) {
                Ok(expense) => Some(expense),
                Err(error) => {
                    log_skipped_record(&self.expenses_path, record, &error);
                    None
                }
            })
            .filter(|expense| &expense.owner == owner && date_range.contains(expense.date))
            .collect();

        Ok(expenses)
    }

    fn replace_expense(
        &self,
        owner: &Username,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, Error> {
        let _guard = self.lock()?;

        let mut records = self.read_expense_records()?;
        let record = records
            .iter_mut()
            .find(|record| is_owned_expense(record, owner, id))
            .ok_or(Error::NotFound)?;

        let expense = Expense {
            id,
            owner: owner.clone(),
            date: update.date,
            category: update.category,
            amount: update.amount,
            description: update.description,
        };
        *record = expense_to_record(&expense);

        write_records(&self.expenses_path, &EXPENSES_HEADER, &records)?;

        Ok(expense)
    }

    fn delete_expense(&self, owner: &Username, id: ExpenseId) -> Result<(), Error> {
        let _guard = self.lock()?;

        let mut records = self.read_expense_records()?;
        let position = records
            .iter()
            .position(|record| is_owned_expense(record, owner, id))
            .ok_or(Error::NotFound)?;
        records.remove(position);

        write_records(&self.expenses_path, &EXPENSES_HEADER, &records)
    }
}

fn header_matches(header: &ByteRecord, want: &[&str]) -> bool {
    header.len() == want.len()
        && header
            .iter()
            .zip(want)
            .all(|(got, want)| got.trim_ascii().eq_ignore_ascii_case(want.as_bytes()))
}

/// Read the header and raw rows of the CSV file at `path`.
///
/// Returns `None` if the file does not exist or is empty. Rows are kept as
/// bytes so that a rewrite can copy rows it cannot decode back unchanged.
fn read_records(path: &Path) -> Result<Option<(ByteRecord, Vec<ByteRecord>)>, Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let header = reader.byte_headers()?.clone();
    if header.is_empty() {
        return Ok(None);
    }

    let records = reader.byte_records().collect::<Result<Vec<_>, _>>()?;

    Ok(Some((header, records)))
}

/// Replace the contents of the file at `path` with `header` and `records`.
///
/// The rows are written to a temporary file which then replaces the original,
/// so a failed write leaves the original file untouched.
fn write_records(path: &Path, header: &[&str], records: &[ByteRecord]) -> Result<(), Error> {
    let temp_path = path.with_extension("csv.tmp");

    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&temp_path)?;
        writer.write_record(header)?;
        for record in records {
            writer.write_byte_record(record)?;
        }
        writer.flush()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Append `record` to the file at `path`, writing `header` first if the file is new.
fn append_record(path: &Path, header: &[&str], record: &ByteRecord) -> Result<(), Error> {
    let needs_header = match fs::metadata(path) {
        Ok(metadata) => metadata.len() == 0,
        Err(error) if error.kind() == ErrorKind::NotFound => true,
        Err(error) => return Err(error.into()),
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if needs_header {
        writer.write_record(header)?;
    }
    writer.write_byte_record(record)?;
    writer.flush()?;

    Ok(())
}

fn log_skipped_record(path: &Path, record: &ByteRecord, error: &Error) {
    let line = record
        .position()
        .map(|position| position.line().to_string())
        .unwrap_or_else(|| "?".to_owned());

    tracing::warn!("Skipping line {line} of {}: {error}", path.display());
}

fn decode_record(record: &ByteRecord) -> Result<StringRecord, Error> {
    StringRecord::from_byte_record(record.clone())
        .map_err(|error| Error::MalformedRecord(format!("invalid UTF-8: {}", error.utf8_error())))
}

fn parse_account(record: &ByteRecord) -> Result<Account, Error> {
    let record = decode_record(record)?;
    if record.len() != USERS_HEADER.len() {
        return Err(Error::MalformedRecord(format!(
            "expected {} fields, got {}",
            USERS_HEADER.len(),
            record.len()
        )));
    }

    let username = &record[0];
    if username.trim().is_empty() {
        return Err(Error::MalformedRecord("empty username".to_owned()));
    }

    Ok(Account::new(
        Username::new_unchecked(username),
        PasswordHash::new_unchecked(&record[1]),
    ))
}

fn parse_expense(record: &ByteRecord) -> Result<Expense, Error> {
    let record = decode_record(record)?;
    if record.len() != EXPENSES_HEADER.len() {
        return Err(Error::MalformedRecord(format!(
            "expected {} fields, got {}",
            EXPENSES_HEADER.len(),
            record.len()
        )));
    }

    let id = record[0]
        .parse::<ExpenseId>()
        .map_err(|error| Error::MalformedRecord(format!("invalid ID {:?}: {error}", &record[0])))?;

    let date = parse_date(&record[2])
        .map_err(|error| Error::MalformedRecord(format!("invalid date {:?}: {error}", &record[2])))?;

    let amount = record[4]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::MalformedRecord(format!("invalid amount {:?}", &record[4])))?;

    Ok(Expense {
        id,
        owner: Username::new_unchecked(&record[1]),
        date,
        category: record[3].to_owned(),
        amount,
        description: record[5].to_owned(),
    })
}

fn expense_to_record(expense: &Expense) -> ByteRecord {
    ByteRecord::from(vec![
        expense.id.to_string(),
        expense.owner.to_string(),
        format_date(expense.date),
        expense.category.clone(),
        expense.amount.to_string(),
        expense.description.clone(),
    ])
}

/// Whether `record` is a readable expense with this `id` and `owner`.
///
/// Rows that [parse_expense] rejects never match, which keeps edit and delete
/// consistent with [RecordStore::get_expense].
fn is_owned_expense(record: &ByteRecord, owner: &Username, id: ExpenseId) -> bool {
    parse_expense(record).is_ok_and(|expense| expense.id == id && &expense.owner == owner)
}
