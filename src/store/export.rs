//! Exports a user's expenses as a CSV document.

use crate::{
    Error, Username,
    expense::format_date,
    store::{DateRange, RecordStore},
};

const EXPORT_HEADER: [&str; 4] = ["date", "category", "amount", "description"];

/// Serialize every expense owned by `owner` to CSV.
///
/// The document has the header `date,category,amount,description` and amounts
/// are written exactly as stored, without rounding.
///
/// # Errors
///
/// Returns any error from reading `store`, or [Error::Storage] if the CSV could
/// not be written.
pub fn export_csv(store: &dyn RecordStore, owner: &Username) -> Result<Vec<u8>, Error> {
    let expenses = store.list_expenses(owner, DateRange::default())?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for expense in &expenses {
        writer.write_record([
            format_date(expense.date),
            expense.category.clone(),
            expense.amount.to_string(),
            expense.description.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::Storage(format!("could not finish CSV export: {error}")))
}
