//! Defines the read-only page listing every expense of the logged in user.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Username, endpoints,
    expense::{
        Expense, ExpenseSummary,
        core::sort_newest_first,
        state::ExpenseState,
        view::{category_totals_view, expense_table_view, summary_cards_view},
    },
    html::{PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    store::DateRange,
};

/// Display all of the user's expenses with their summary, newest first.
pub async fn get_expenses_page(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
) -> Response {
    match state.store.list_expenses(&username, DateRange::default()) {
        Ok(mut expenses) => {
            sort_newest_first(&mut expenses);
            expenses_view(&username, &expenses).into_response()
        }
        Err(error) => {
            tracing::error!("Could not list expenses for {username}: {error}");
            error.into_response()
        }
    }
}

fn expenses_view(username: &Username, expenses: &[Expense]) -> Markup {
    let nav_bar = NavBar::new(endpoints::VIEW_EXPENSES, username).into_html();
    let summary = ExpenseSummary::from_expenses(expenses);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold" { "All Expenses" }

            p class="text-gray-600 dark:text-gray-400"
            {
                "To add or change expenses, go to the "
                (link(endpoints::DASHBOARD, "dashboard"))
                "."
            }

            (summary_cards_view(&summary, None))
            (category_totals_view(&summary))
            (expense_table_view(expenses, false))
        }
    };

    base("All Expenses", &[], &content)
}
