//! The dashboard page for adding, filtering and summarising expenses.

use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error, Username,
    endpoints::{self, format_endpoint},
    expense::{
        BudgetStatus, Expense, ExpenseSummary, NewExpense, SUGGESTED_CATEGORIES,
        budget::get_budget_from_cookies,
        core::{format_date, parse_amount, parse_date, sort_newest_first},
        state::ExpenseState,
        view::{category_totals_view, expense_table_view, summary_cards_view},
    },
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    store::DateRange,
    timezone::get_local_date,
};

const CATEGORY_SUGGESTIONS_ID: &str = "category-suggestions";

/// Fetches an expense as JSON and opens the edit dialog filled with its fields.
const EDIT_DIALOG_SCRIPT: &str = r#"
async function openEditDialog(url) {
    const response = await fetch(url, { headers: { "Accept": "application/json" } });

    if (!response.ok) {
        alert("Could not load the expense. Try refreshing the page.");
        return;
    }

    const expense = await response.json();
    const form = document.getElementById("edit-form");
    form.action = url;
    form.elements["date"].value = expense.date;
    form.elements["category"].value = expense.category;
    form.elements["amount"].value = expense.amount;
    form.elements["description"].value = expense.description;
    document.getElementById("edit-dialog").showModal();
}
"#;

/// The optional filters of the dashboard.
///
/// The values are kept as strings so that blank or malformed filters can be
/// ignored rather than rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilterQuery {
    /// The earliest date to show, as YYYY-MM-DD.
    pub start_date: Option<String>,
    /// The latest date to show, as YYYY-MM-DD.
    pub end_date: Option<String>,
    /// Only show expenses in this category, ignoring case.
    pub category: Option<String>,
    /// Only show expenses whose description contains this text, ignoring case.
    pub search: Option<String>,
}

impl ExpenseFilterQuery {
    /// The date range described by the query, ignoring blank or invalid bounds.
    fn date_range(&self) -> DateRange {
        DateRange::new(
            parse_date_filter("start_date", self.start_date.as_deref()),
            parse_date_filter("end_date", self.end_date.as_deref()),
        )
    }

    fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Whether `expense` passes the category and search filters.
    ///
    /// The date range is applied by the store.
    fn matches(&self, expense: &Expense) -> bool {
        let matches_category = self
            .category()
            .is_none_or(|category| expense.category.trim().eq_ignore_ascii_case(category));
        let matches_search = self.search().is_none_or(|search| {
            expense
                .description
                .to_lowercase()
                .contains(&search.to_lowercase())
        });

        matches_category && matches_search
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// The filters as shown in the filter form after parsing.
struct ActiveFilters<'a> {
    date_range: DateRange,
    category: Option<&'a str>,
    search: Option<&'a str>,
}

impl ActiveFilters<'_> {
    fn is_empty(&self) -> bool {
        self.date_range.is_unbounded() && self.category.is_none() && self.search.is_none()
    }
}

fn parse_date_filter(name: &str, raw_date: Option<&str>) -> Option<Date> {
    let raw_date = raw_date?.trim();

    if raw_date.is_empty() {
        return None;
    }

    match parse_date(raw_date) {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::warn!("Ignoring invalid {name} filter {raw_date:?}: {error}");
            None
        }
    }
}

/// Display the dashboard with the expenses of the logged in user, newest first.
///
/// The expenses, the summary and the budget status only take into account
/// expenses that pass the filters given in the query string.
pub async fn get_dashboard_page(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
    Query(query): Query<ExpenseFilterQuery>,
    jar: PrivateCookieJar,
) -> Response {
    let filters = ActiveFilters {
        date_range: query.date_range(),
        category: query.category(),
        search: query.search(),
    };

    let mut expenses = match state.store.list_expenses(&username, filters.date_range) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("Could not list expenses for {username}: {error}");
            return error.into_response();
        }
    };
    expenses.retain(|expense| query.matches(expense));
    sort_newest_first(&mut expenses);

    let summary = ExpenseSummary::from_expenses(&expenses);
    let budget_status =
        get_budget_from_cookies(&jar).map(|budget| BudgetStatus::new(budget, summary.total_amount));

    dashboard_view(&username, &expenses, &summary, budget_status, &filters).into_response()
}

fn dashboard_view(
    username: &Username,
    expenses: &[Expense],
    summary: &ExpenseSummary,
    budget_status: Option<BudgetStatus>,
    filters: &ActiveFilters,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD, username).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold" { "Dashboard" }

            div class="w-full flex flex-col lg:flex-row gap-6 justify-center"
            {
                (add_expense_form())
                (budget_form(budget_status.map(|status| status.budget)))
            }

            (filter_form(filters))
            (summary_cards_view(summary, budget_status))
            (category_totals_view(summary))

            section class="w-full"
            {
                h3 class="text-xl font-semibold mb-4" { "Expenses" }
                (expense_table_view(expenses, true))
            }

            (edit_dialog())
        }
    };

    base(
        "Dashboard",
        &[
            dollar_input_styles(),
            HeadElement::ScriptSource(PreEscaped(EDIT_DIALOG_SCRIPT.to_owned())),
        ],
        &content,
    )
}

fn category_suggestions() -> Markup {
    html! {
        datalist id=(CATEGORY_SUGGESTIONS_ID)
        {
            @for category in SUGGESTED_CATEGORIES {
                option value=(category) {}
            }
        }
    }
}

fn add_expense_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::DASHBOARD)
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-semibold" { "Add Expense" }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper"
                {
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    type="text"
                    name="category"
                    id="category"
                    list=(CATEGORY_SUGGESTIONS_ID)
                    placeholder="Food"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                (category_suggestions())
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="Lunch with friends"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

fn budget_form(budget: Option<f64>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::SET_BUDGET)
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-semibold" { "Budget" }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Your budget is kept until you log out or close your browser."
            }

            div
            {
                label for="budget" class=(FORM_LABEL_STYLE) { "Budget" }

                div class="input-wrapper"
                {
                    input
                        type="number"
                        name="budget"
                        id="budget"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        value=[budget.map(|budget| format!("{budget:.2}"))]
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Set Budget" }
        }
    }
}

fn filter_form(filters: &ActiveFilters) -> Markup {
    let start_date = filters.date_range.start.map(format_date);
    let end_date = filters.date_range.end.map(format_date);

    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD)
            class="w-full flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="start_date"
                    id="start_date"
                    value=[start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="end_date"
                    id="end_date"
                    value=[end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_filter" class=(FORM_LABEL_STYLE) { "Category" }
                input
                    type="text"
                    name="category"
                    id="category_filter"
                    list=(CATEGORY_SUGGESTIONS_ID)
                    placeholder="All categories"
                    value=[filters.category]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Filter by description..."
                    value=[filters.search]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="w-32"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
            }

            @if !filters.is_empty() {
                a href=(endpoints::DASHBOARD) class={(LINK_STYLE) " mb-4"} { "Clear filters" }
            }
        }
    }
}

fn edit_dialog() -> Markup {
    html! {
        dialog id="edit-dialog" class="rounded-lg shadow-lg p-0 backdrop:bg-gray-900/50"
        {
            form
                id="edit-form"
                method="post"
                action=(format_endpoint(endpoints::EDIT_EXPENSE, ""))
                class=(FORM_CONTAINER_STYLE)
            {
                h2 class="text-xl font-semibold" { "Edit Expense" }

                div
                {
                    label for="edit-date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="edit-date"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="edit-category" class=(FORM_LABEL_STYLE) { "Category" }
                    input
                        type="text"
                        name="category"
                        id="edit-category"
                        list=(CATEGORY_SUGGESTIONS_ID)
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="edit-amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            name="amount"
                            id="edit-amount"
                            step="0.01"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }
                }

                div
                {
                    label for="edit-description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        type="text"
                        name="description"
                        id="edit-description"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex gap-4"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="document.getElementById('edit-dialog').close()"
                    {
                        "Cancel"
                    }
                }
            }
        }
    }
}

/// The form data for adding an expense.
///
/// The amount is kept as a string so that a non-numeric amount can be
/// rejected with a plain text error.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// The amount spent in dollars.
    pub amount: String,
    /// The category of the expense.
    pub category: String,
    /// Text detailing the expense.
    #[serde(default)]
    pub description: String,
}

/// A route handler for adding an expense dated today, redirects to the dashboard on success.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(username): Extension<Username>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let amount = match parse_amount(&form.amount) {
        Ok(amount) => amount,
        Err(error) => {
            tracing::info!("Rejected new expense: {error}");
            return (
                StatusCode::BAD_REQUEST,
                "Invalid amount. Please enter a number.",
            )
                .into_response();
        }
    };

    let Some(today) = get_local_date(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let new_expense = NewExpense {
        owner: username,
        date: today,
        category: form.category.trim().to_owned(),
        amount,
        description: form.description.trim().to_owned(),
    };

    match state.store.append_expense(new_expense) {
        Ok(expense) => {
            tracing::info!("Recorded expense {} for {}", expense.id, expense.owner);
            Redirect::to(endpoints::DASHBOARD).into_response()
        }
        Err(error) => {
            tracing::error!("Could not record expense: {error}");
            error.into_response()
        }
    }
}
