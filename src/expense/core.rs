//! Defines the core data models for expenses.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

use crate::{Error, Username};

/// The format dates are stored, exported and submitted in, e.g. "2024-01-15".
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// Format `date` as YYYY-MM-DD.
pub(crate) fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a YYYY-MM-DD date string.
pub(crate) fn parse_date(raw_date: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw_date.trim(), DATE_FORMAT)
}

/// Parse a finite amount of money entered in a form, e.g. "12.50".
pub(crate) fn parse_amount(raw_amount: &str) -> Result<f64, Error> {
    match raw_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount(raw_amount.to_owned())),
    }
}

/// Order `expenses` newest first.
///
/// Expenses on the same day keep the most recently recorded first, assuming
/// `expenses` is in the order they were recorded.
pub(crate) fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.reverse();
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}

pub(crate) mod date_format {
    //! Serializes a [time::Date] as a YYYY-MM-DD string.
    //!
    //! The default serializer for [time::Date] uses a compact tuple
    //! representation which a date input on the page cannot read.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{DATE_FORMAT, parse_date};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_date(&s).map_err(serde::de::Error::custom)
    }
}

/// A stable, unique identifier for an expense.
///
/// IDs are generated when an expense is created and stored alongside it, so
/// edits and deletes keep addressing the same record even if other records
/// are added or removed in the meantime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Generate a new random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Money spent by a user on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user that recorded the expense.
    pub owner: Username,
    /// When the money was spent.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A free-form label used to group expenses, e.g. "Food" or "Transport".
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
    /// A text description of what the money was spent on.
    pub description: String,
}

/// The data needed to record a new [Expense].
///
/// The store assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The user recording the expense.
    pub owner: Username,
    /// When the money was spent.
    pub date: Date,
    /// A free-form label used to group expenses.
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
    /// A text description of what the money was spent on.
    pub description: String,
}

impl NewExpense {
    /// Attach `id` to the new expense.
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            owner: self.owner,
            date: self.date,
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// The fields of an [Expense] that can be edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    /// When the money was spent.
    pub date: Date,
    /// A free-form label used to group expenses.
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
    /// A text description of what the money was spent on.
    pub description: String,
}

impl ExpenseUpdate {
    /// Overwrite the editable fields of `expense`.
    pub fn apply_to(self, expense: &mut Expense) {
        expense.date = self.date;
        expense.category = self.category;
        expense.amount = self.amount;
        expense.description = self.description;
    }
}

/// Categories suggested in the expense form.
///
/// Any other category is accepted too.
pub const SUGGESTED_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Utilities",
    "Entertainment",
    "Health",
    "Shopping",
    "Other",
];

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Username,
        expense::core::{
            Expense, ExpenseId, format_date, parse_amount, parse_date, sort_newest_first,
        },
    };

    #[test]
    fn parse_amount_accepts_decimals_and_negatives() {
        assert_eq!(parse_amount("12.5"), Ok(12.5));
        assert_eq!(parse_amount(" -3 "), Ok(-3.0));
    }

    #[test]
    fn parse_amount_rejects_non_numbers() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn format_date_pads_month_and_day() {
        assert_eq!(format_date(date!(2024 - 01 - 05)), "2024-01-05");
    }

    #[test]
    fn parse_date_accepts_surrounding_whitespace() {
        assert_eq!(parse_date(" 2024-02-29 "), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-1-5").is_err());
    }

    #[test]
    fn expense_id_parses_its_display_form() {
        let id = ExpenseId::generate();

        assert_eq!(id.to_string().parse::<ExpenseId>(), Ok(id));
    }

    #[test]
    fn expense_serializes_date_as_string() {
        let id = ExpenseId::generate();
        let expense = Expense {
            id,
            owner: Username::new_unchecked("alice"),
            date: date!(2024 - 01 - 15),
            category: "Food".to_owned(),
            amount: 12.5,
            description: "Lunch".to_owned(),
        };

        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["owner"], "alice");
    }

    #[test]
    fn sorts_newest_first_with_later_records_first_on_the_same_day() {
        let expense = |date, description: &str| Expense {
            id: ExpenseId::generate(),
            owner: Username::new_unchecked("alice"),
            date,
            category: "Food".to_owned(),
            amount: 1.0,
            description: description.to_owned(),
        };
        let mut expenses = vec![
            expense(date!(2024 - 01 - 01), "oldest"),
            expense(date!(2024 - 03 - 01), "newest, first recorded"),
            expense(date!(2024 - 02 - 01), "middle"),
            expense(date!(2024 - 03 - 01), "newest, last recorded"),
        ];

        sort_newest_first(&mut expenses);

        let descriptions: Vec<&str> = expenses
            .iter()
            .map(|expense| expense.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            [
                "newest, last recorded",
                "newest, first recorded",
                "middle",
                "oldest"
            ]
        );
    }
}
