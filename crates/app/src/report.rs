//! Plain-text rendering of the list, summary and account views.

use api_types::{auth::User, expense::Expense};
use engine::{Summary, format_amount, format_percent, format_whole};

const BAR_WIDTH: usize = 20;

pub fn expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses yet. Add your first expense with `add`.".to_string();
    }

    let mut lines = vec!["Recent Expenses".to_string()];
    lines.extend(expenses.iter().map(|expense| {
        format!(
            "  {:<26} {}  {:<24} {:<14} {:>12}",
            truncate_string(&expense.id, 26),
            expense.date.format("%d %b %Y"),
            truncate_string(&expense.title, 24),
            expense.category.label(),
            format_amount(expense.amount),
        )
    }));
    lines.join("\n")
}

pub fn summary(summary: &Summary) -> String {
    let mut lines = vec![
        "Total Expenses".to_string(),
        format!("  {}", format_amount(summary.total)),
    ];

    if !summary.top.is_empty() {
        lines.push(String::new());
        lines.push("Top Categories".to_string());
        lines.extend(summary.top.iter().map(|share| {
            format!(
                "  {:<16}{:>12}  {} {:>6}",
                share.category.label(),
                format_amount(share.amount),
                bar(share.percentage / 100.0),
                format_percent(share.percentage),
            )
        }));
    }

    lines.push(String::new());
    lines.push("Statistics".to_string());
    lines.push(format!("  {:<20}{}", "Total Transactions", summary.count));
    lines.push(format!(
        "  {:<20}{}",
        "Average Expense",
        format_whole(summary.average)
    ));

    if !summary.breakdown.is_empty() {
        let max = summary
            .breakdown
            .iter()
            .map(|entry| entry.amount)
            .fold(0.0_f64, f64::max);
        lines.push(String::new());
        lines.push("Spending by Category".to_string());
        lines.extend(summary.breakdown.iter().map(|entry| {
            let fraction = if max > 0.0 { entry.amount / max } else { 0.0 };
            format!(
                "  {:<16}{} {}",
                entry.category.label(),
                bar(fraction),
                format_amount(entry.amount),
            )
        }));
    }

    lines.join("\n")
}

pub fn account(user: Option<&User>) -> String {
    let Some(user) = user else {
        return "No account information available.".to_string();
    };
    [
        format!("[{}] {}", user.initial(), user.name),
        format!("  Email    {}", user.email),
        format!("  User ID  {}", user.id),
    ]
    .join("\n")
}

fn bar(fraction: f64) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
