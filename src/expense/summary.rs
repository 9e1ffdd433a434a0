//! Aggregates expenses into the totals shown on the dashboard.

use std::collections::BTreeMap;

use crate::expense::Expense;

/// Totals computed from a list of expenses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseSummary {
    /// The number of expenses.
    pub count: usize,
    /// The sum of all expense amounts.
    pub total_amount: f64,
    /// The sum of expense amounts per category, ordered by category name.
    pub category_totals: BTreeMap<String, f64>,
}

impl ExpenseSummary {
    /// Compute the count, total and per-category totals of `expenses`.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut category_totals = BTreeMap::new();
        let mut total_amount = 0.0;

        for expense in expenses {
            total_amount += expense.amount;
            *category_totals
                .entry(expense.category.clone())
                .or_insert(0.0) += expense.amount;
        }

        Self {
            count: expenses.len(),
            total_amount,
            category_totals,
        }
    }
}

/// How the spending in a summary compares to the user's budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// The budget set by the user.
    pub budget: f64,
    /// The budget minus the total spent, negative when over budget.
    pub remaining: f64,
    /// The total spent as a percentage of the budget, zero for a zero budget.
    pub percent_used: f64,
}

impl BudgetStatus {
    /// Compare `total_spent` against `budget`.
    pub fn new(budget: f64, total_spent: f64) -> Self {
        let percent_used = if budget > 0.0 {
            total_spent / budget * 100.0
        } else {
            0.0
        };

        Self {
            budget,
            remaining: budget - total_spent,
            percent_used,
        }
    }

    /// Whether more has been spent than budgeted.
    pub fn is_over_budget(&self) -> bool {
        self.remaining < 0.0
    }

    /// The warning to show once spending reaches 90% of the budget.
    pub fn warning(&self) -> Option<BudgetWarning> {
        if self.percent_used >= EXCEEDED_PERCENT {
            Some(BudgetWarning::Exceeded)
        } else if self.percent_used >= APPROACHING_PERCENT {
            Some(BudgetWarning::Approaching)
        } else {
            None
        }
    }
}

const APPROACHING_PERCENT: f64 = 90.0;
const EXCEEDED_PERCENT: f64 = 100.0;

/// A notice that spending is close to or over the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetWarning {
    /// At least 90% of the budget has been spent.
    Approaching,
    /// All of the budget has been spent.
    Exceeded,
}
