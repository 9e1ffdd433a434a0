//! Expenses, their summaries and the pages and endpoints for managing them.

mod budget;
mod core;
mod dashboard;
mod delete_endpoint;
mod download;
mod edit_endpoint;
mod expenses_page;
mod state;
mod summary;
mod view;

pub use budget::set_budget_endpoint;
pub use core::{Expense, ExpenseId, ExpenseUpdate, NewExpense, SUGGESTED_CATEGORIES};
pub use dashboard::{create_expense_endpoint, get_dashboard_page};
pub use delete_endpoint::delete_expense_endpoint;
pub use download::download_expenses_endpoint;
pub use edit_endpoint::{edit_expense_endpoint, get_expense_endpoint};
pub use expenses_page::get_expenses_page;
pub use summary::{BudgetStatus, BudgetWarning, ExpenseSummary};

pub(crate) use budget::invalidate_budget_cookie;
pub(crate) use core::{format_date, parse_date};

#[cfg(test)]
pub(crate) use budget::{COOKIE_BUDGET, set_budget_cookie};
