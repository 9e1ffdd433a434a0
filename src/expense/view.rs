//! Components shared by the dashboard and the expenses page.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    expense::{BudgetStatus, BudgetWarning, Expense, ExpenseSummary, format_date},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-1";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";
const OVER_BUDGET_STYLE: &str = "text-red-600 dark:text-red-400";
const UNDER_BUDGET_STYLE: &str = "text-green-600 dark:text-green-400";
const WARNING_STYLE: &str = "w-full p-4 rounded-lg border border-yellow-300 bg-yellow-50 \
    text-yellow-800 dark:border-yellow-800 dark:bg-gray-800 dark:text-yellow-300";

/// Formats a percentage with one decimal place, avoiding "-0.0%".
fn format_percentage(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        "0.0%".to_owned()
    } else {
        format!("{rounded:.1}%")
    }
}

fn summary_card(label: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            span class=(CARD_LABEL_STYLE) { (label) }
            span class={(CARD_VALUE_STYLE) " " (value_style)} data-summary=(label) { (value) }
        }
    }
}

fn budget_warning_view(status: BudgetStatus) -> Markup {
    let message = match status.warning() {
        Some(BudgetWarning::Exceeded) => format!(
            "Warning: You've exceeded your budget of {}.",
            format_currency(status.budget)
        ),
        Some(BudgetWarning::Approaching) => {
            "You are approaching your budget limit, with over 90% spent.".to_owned()
        }
        None => return html! {},
    };

    html! {
        div id="budget-warning" role="alert" class=(WARNING_STYLE) { (message) }
    }
}

/// Renders the expense count and total, plus the budget cards if a budget is set.
///
/// A warning is shown above the cards once 90% of the budget has been spent.
pub(super) fn summary_cards_view(
    summary: &ExpenseSummary,
    budget_status: Option<BudgetStatus>,
) -> Markup {
    html! {
        @if let Some(status) = budget_status {
            (budget_warning_view(status))
        }

        section class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-5 gap-4"
        {
            (summary_card("Expenses", &summary.count.to_string(), ""))
            (summary_card("Total Spent", &format_currency(summary.total_amount), ""))

            @if let Some(status) = budget_status {
                @let status_style = if status.is_over_budget() {
                    OVER_BUDGET_STYLE
                } else {
                    UNDER_BUDGET_STYLE
                };

                (summary_card("Budget", &format_currency(status.budget), ""))
                (summary_card("Remaining", &format_currency(status.remaining), status_style))
                (summary_card("Budget Used", &format_percentage(status.percent_used), status_style))
            }
        }
    }
}

/// Renders the total spent in each category.
pub(super) fn category_totals_view(summary: &ExpenseSummary) -> Markup {
    if summary.category_totals.is_empty() {
        return html! {};
    }

    html! {
        section class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Spending by Category" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id="category-totals" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        }
                    }

                    tbody
                    {
                        @for (category, total) in &summary.category_totals {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (category) }
                                }
                                td class=(TABLE_CELL_STYLE) { (format_currency(*total)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the expenses as a table.
///
/// If `editable` is set, each row gets an edit button that opens the edit
/// dialog and a delete button.
pub(super) fn expense_table_view(expenses: &[Expense], editable: bool) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table id="expenses" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }

                        @if editable {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (expense_row(expense, editable))
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan=(if editable { 5 } else { 4 }) class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No expenses recorded yet."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense, editable: bool) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
        {
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (format_date(expense.date)) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
            }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE) { (expense.description) }

            @if editable {
                td class={(TABLE_CELL_STYLE) " flex gap-4"}
                {
                    button
                        type="button"
                        class=(LINK_STYLE)
                        data-url=(format_endpoint(endpoints::EDIT_EXPENSE, expense.id))
                        onclick="openEditDialog(this.dataset.url)"
                    {
                        "Edit"
                    }

                    form
                        method="post"
                        action=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                        onsubmit="return confirm('Are you sure you want to delete this expense?')"
                    {
                        button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use maud::Markup;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Username,
        endpoints::{self, format_endpoint},
        expense::{BudgetStatus, Expense, ExpenseId, ExpenseSummary},
    };

    use super::{expense_table_view, format_percentage, summary_cards_view};

    fn parse(markup: Markup) -> Html {
        Html::parse_fragment(&markup.into_string())
    }

    fn expense(amount: f64) -> Expense {
        Expense {
            id: ExpenseId::generate(),
            owner: Username::new_unchecked("alice"),
            date: date!(2024 - 01 - 15),
            category: "Food".to_owned(),
            amount,
            description: "Lunch".to_owned(),
        }
    }

    fn summary_values(html: &Html) -> Vec<(String, String)> {
        let selector = Selector::parse("[data-summary]").unwrap();
        html.select(&selector)
            .map(|element| {
                (
                    element.value().attr("data-summary").unwrap().to_owned(),
                    element.text().collect::<String>(),
                )
            })
            .collect()
    }

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_percentage(25.0), "25.0%");
        assert_eq!(format_percentage(33.333), "33.3%");
        assert_eq!(format_percentage(-0.01), "0.0%");
    }

    #[test]
    fn summary_without_budget_has_two_cards() {
        let summary = ExpenseSummary::from_expenses(&[expense(10.0), expense(5.5)]);

        let html = parse(summary_cards_view(&summary, None));

        assert_eq!(
            summary_values(&html),
            vec![
                ("Expenses".to_owned(), "2".to_owned()),
                ("Total Spent".to_owned(), "$15.50".to_owned()),
            ]
        );
    }

    #[test]
    fn summary_with_budget_shows_remaining_and_percent() {
        let summary = ExpenseSummary::from_expenses(&[expense(50.0)]);

        let html = parse(summary_cards_view(
            &summary,
            Some(BudgetStatus::new(200.0, summary.total_amount)),
        ));

        let values = summary_values(&html);
        assert_eq!(values.len(), 5);
        assert_eq!(values[2], ("Budget".to_owned(), "$200.00".to_owned()));
        assert_eq!(values[3], ("Remaining".to_owned(), "$150.00".to_owned()));
        assert_eq!(values[4], ("Budget Used".to_owned(), "25.0%".to_owned()));
    }

    fn budget_warning_text(html: &Html) -> Option<String> {
        html.select(&Selector::parse("#budget-warning").unwrap())
            .next()
            .map(|element| element.text().collect())
    }

    #[test]
    fn no_budget_warning_below_ninety_percent() {
        let summary = ExpenseSummary::from_expenses(&[expense(50.0)]);

        let html = parse(summary_cards_view(
            &summary,
            Some(BudgetStatus::new(100.0, summary.total_amount)),
        ));

        assert_eq!(budget_warning_text(&html), None);
    }

    #[test]
    fn budget_warning_when_approaching_budget() {
        let summary = ExpenseSummary::from_expenses(&[expense(95.0)]);

        let html = parse(summary_cards_view(
            &summary,
            Some(BudgetStatus::new(100.0, summary.total_amount)),
        ));

        assert_eq!(
            budget_warning_text(&html).as_deref(),
            Some("You are approaching your budget limit, with over 90% spent.")
        );
    }

    #[test]
    fn budget_warning_when_budget_exceeded() {
        let summary = ExpenseSummary::from_expenses(&[expense(120.0)]);

        let html = parse(summary_cards_view(
            &summary,
            Some(BudgetStatus::new(100.0, summary.total_amount)),
        ));

        assert_eq!(
            budget_warning_text(&html).as_deref(),
            Some("Warning: You've exceeded your budget of $100.00.")
        );
    }

    #[test]
    fn editable_table_has_edit_and_delete_per_row() {
        let expense = expense(12.0);

        let html = parse(expense_table_view(std::slice::from_ref(&expense), true));

        let edit_button = html
            .select(&Selector::parse("button[data-url]").unwrap())
            .next()
            .expect("No edit button found");
        assert_eq!(
            edit_button.value().attr("data-url"),
            Some(format_endpoint(endpoints::EDIT_EXPENSE, expense.id).as_str())
        );
        let delete_form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No delete form found");
        assert_eq!(
            delete_form.value().attr("action"),
            Some(format_endpoint(endpoints::DELETE_EXPENSE, expense.id).as_str())
        );
    }

    #[test]
    fn read_only_table_has_no_actions() {
        let html = parse(expense_table_view(&[expense(12.0)], false));

        assert_eq!(html.select(&Selector::parse("form").unwrap()).count(), 0);
        assert_eq!(html.select(&Selector::parse("button").unwrap()).count(), 0);
    }

    #[test]
    fn empty_table_shows_placeholder() {
        let html = parse(expense_table_view(&[], false));

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No expenses recorded yet."));
    }
}
