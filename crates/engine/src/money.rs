//! Display helpers for amounts.
//!
//! Amounts are currency-agnostic magnitudes, so no symbol is attached.

/// Formats with two decimals and thousands separators.
///
/// ```rust
/// assert_eq!(engine::format_amount(1234.5), "1,234.50");
/// ```
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format_with_decimals(amount, 2)
}

/// Formats rounded to a whole number, e.g. the average transaction.
#[must_use]
pub fn format_whole(amount: f64) -> String {
    format_with_decimals(amount, 0)
}

/// Formats a percentage with one decimal.
#[must_use]
pub fn format_percent(percentage: f64) -> String {
    let percentage = if percentage.is_finite() { percentage } else { 0.0 };
    format!("{percentage:.1}%")
}

fn format_with_decimals(amount: f64, decimals: usize) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let digits = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let nonzero = digits.chars().any(|ch| ch.is_ascii_digit() && ch != '0');
    let sign = if amount < 0.0 && nonzero { "-" } else { "" };

    match fraction {
        Some(fraction) => format!("{sign}{}.{fraction}", group_thousands(whole)),
        None => format!("{sign}{}", group_thousands(whole)),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
