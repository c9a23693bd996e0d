//! Derived statistics over an expense collection.
//!
//! Nothing is cached: callers re-invoke after the collection changes.

use api_types::{Category, expense::Expense};

/// How many categories the summary ranks.
pub const TOP_CATEGORIES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
}

/// A ranked category with its share of the grand total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    /// Percentage in `0.0..=100.0`, never NaN.
    pub percentage: f64,
}

/// Everything the summary and chart views need, computed in one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub top: Vec<CategoryShare>,
    /// Every category in grouping order (chart data).
    pub breakdown: Vec<CategoryTotal>,
}

impl Summary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let total = total(expenses);
        let breakdown = category_totals(expenses);
        let top = rank(breakdown.clone())
            .into_iter()
            .map(|entry| CategoryShare {
                category: entry.category,
                amount: entry.amount,
                percentage: percentage_share(entry.amount, total),
            })
            .collect();

        Self {
            total,
            count: expenses.len(),
            average: average(expenses),
            top,
            breakdown,
        }
    }
}

fn amount_of(expense: &Expense) -> f64 {
    if expense.amount.is_finite() {
        expense.amount
    } else {
        0.0
    }
}

/// Sum of all amounts, `0.0` for an empty collection.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(amount_of).sum()
}

/// Per-category sums in order of first appearance.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        let amount = amount_of(expense);
        match totals
            .iter_mut()
            .find(|entry| entry.category == expense.category)
        {
            Some(entry) => entry.amount += amount,
            None => totals.push(CategoryTotal {
                category: expense.category,
                amount,
            }),
        }
    }
    totals
}

/// Category totals by descending amount, at most [`TOP_CATEGORIES`] entries.
///
/// Ties keep grouping order.
pub fn top_categories(expenses: &[Expense]) -> Vec<CategoryTotal> {
    rank(category_totals(expenses))
}

fn rank(mut totals: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    // `sort_by` is stable.
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals.truncate(TOP_CATEGORIES);
    totals
}

/// `part / total * 100`, or `0.0` when the total is zero.
pub fn percentage_share(part: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() {
        return 0.0;
    }
    let share = part / total * 100.0;
    if share.is_finite() { share } else { 0.0 }
}

/// Average transaction value, `0.0` for an empty collection.
pub fn average(expenses: &[Expense]) -> f64 {
    if expenses.is_empty() {
        return 0.0;
    }
    total(expenses) / expenses.len() as f64
}
