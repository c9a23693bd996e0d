//! Raw form input turned into request payloads.

use api_types::{
    Category,
    auth::{LoginRequest, RegisterRequest},
    expense::{ExpenseUpdate, NewExpense},
};
use chrono::NaiveDate;

use crate::{DraftError, ResultDraft};

/// Unvalidated input for a new expense, as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl ExpenseDraft {
    /// Checks every field is present and well formed.
    ///
    /// Rules:
    /// - title must not be blank (it is trimmed)
    /// - amount accepts `.` or `,` as decimal separator, at most 2 decimals,
    ///   no thousands separators, and must be `>= 0`
    /// - category must be one of [`Category::ALL`] (case-insensitive)
    /// - date must be `YYYY-MM-DD`
    pub fn validate(&self) -> ResultDraft<NewExpense> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }

        Ok(NewExpense {
            title: title.to_string(),
            amount: parse_amount(&self.amount)?,
            category: parse_category(&self.category)?,
            date: parse_date(&self.date)?,
        })
    }
}

/// Unvalidated partial update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateDraft {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl UpdateDraft {
    pub fn validate(&self) -> ResultDraft<ExpenseUpdate> {
        let title = match self.title.as_deref().map(str::trim) {
            Some("") => return Err(DraftError::MissingTitle),
            Some(title) => Some(title.to_string()),
            None => None,
        };

        let update = ExpenseUpdate {
            title,
            amount: self.amount.as_deref().map(parse_amount).transpose()?,
            category: self.category.as_deref().map(parse_category).transpose()?,
            date: self.date.as_deref().map(parse_date).transpose()?,
        };

        if update.is_empty() {
            return Err(DraftError::EmptyUpdate);
        }
        Ok(update)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl LoginDraft {
    pub fn validate(&self) -> ResultDraft<LoginRequest> {
        let email = required("Email", &self.email)?;
        if self.password.is_empty() {
            return Err(DraftError::MissingField("Password"));
        }
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupDraft {
    pub fn validate(&self) -> ResultDraft<RegisterRequest> {
        let name = required("Name", &self.name)?;
        let email = required("Email", &self.email)?;
        if self.password.is_empty() {
            return Err(DraftError::MissingField("Password"));
        }
        if self.password != self.confirm_password {
            return Err(DraftError::PasswordMismatch);
        }
        Ok(RegisterRequest {
            name,
            email,
            password: self.password.clone(),
        })
    }
}

fn required(field: &'static str, value: &str) -> ResultDraft<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DraftError::MissingField(field));
    }
    Ok(value.to_string())
}

fn parse_amount(raw: &str) -> ResultDraft<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DraftError::MissingAmount);
    }
    let invalid = || DraftError::InvalidAmount(raw.to_string());

    // One separator at most, `.` or `,`, followed by up to 2 digits.
    let normalized = raw.replace(',', ".");
    let unsigned = normalized.strip_prefix(['-', '+']).unwrap_or(normalized.as_str());
    let mut parts = unsigned.split('.');
    let whole = parts.next().ok_or_else(invalid)?;
    let fraction = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    let is_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if !is_digits(whole) || fraction.is_some_and(|digits| !is_digits(digits) || digits.len() > 2) {
        return Err(invalid());
    }

    let amount = normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(invalid)?;

    if amount < 0.0 {
        return Err(DraftError::NegativeAmount);
    }
    Ok(amount)
}

fn parse_category(raw: &str) -> ResultDraft<Category> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DraftError::MissingCategory);
    }
    Category::from_label(raw).ok_or_else(|| DraftError::UnknownCategory(raw.to_string()))
}

fn parse_date(raw: &str) -> ResultDraft<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DraftError::MissingDate);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DraftError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, amount: &str, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            title: title.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn valid_draft_becomes_payload() {
        let payload = draft(" Groceries ", "12,50", "food", "2024-05-01")
            .validate()
            .unwrap();
        assert_eq!(payload.title, "Groceries");
        assert_eq!(payload.amount, 12.5);
        assert_eq!(payload.category, Category::Food);
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        let payload = draft("Rent", "1234.5", "Bills", "2024-05-01")
            .validate()
            .unwrap();
        assert_eq!(payload.amount, 1234.5);
    }

    #[test]
    fn missing_fields_are_reported() {
        assert_eq!(
            draft("  ", "1", "Food", "2024-05-01").validate(),
            Err(DraftError::MissingTitle)
        );
        assert_eq!(
            draft("x", "", "Food", "2024-05-01").validate(),
            Err(DraftError::MissingAmount)
        );
        assert_eq!(
            draft("x", "1", "", "2024-05-01").validate(),
            Err(DraftError::MissingCategory)
        );
        assert_eq!(
            draft("x", "1", "Food", "").validate(),
            Err(DraftError::MissingDate)
        );
    }

    #[test]
    fn malformed_fields_are_rejected() {
        assert!(matches!(
            draft("x", "abc", "Food", "2024-05-01").validate(),
            Err(DraftError::InvalidAmount(_))
        ));
        assert!(matches!(
            draft("x", "NaN", "Food", "2024-05-01").validate(),
            Err(DraftError::InvalidAmount(_))
        ));
        for amount in ["1,234", "1,234.50", "12.345", "1e5", "12.", ".5"] {
            assert_eq!(
                draft("x", amount, "Food", "2024-05-01").validate(),
                Err(DraftError::InvalidAmount(amount.to_string())),
                "{amount}"
            );
        }
        assert_eq!(
            draft("x", "-3", "Food", "2024-05-01").validate(),
            Err(DraftError::NegativeAmount)
        );
        assert_eq!(
            draft("x", "3", "Pets", "2024-05-01").validate(),
            Err(DraftError::UnknownCategory("Pets".to_string()))
        );
        assert!(matches!(
            draft("x", "3", "Food", "01/05/2024").validate(),
            Err(DraftError::InvalidDate(_))
        ));
    }

    #[test]
    fn update_requires_at_least_one_field() {
        assert_eq!(
            UpdateDraft::default().validate(),
            Err(DraftError::EmptyUpdate)
        );

        let update = UpdateDraft {
            amount: Some("8".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(update.amount, Some(8.0));
        assert!(update.title.is_none());
    }

    #[test]
    fn signup_checks_password_confirmation() {
        let mut signup = SignupDraft {
            name: "Govind".to_string(),
            email: "govind@gmail.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secrets".to_string(),
        };
        assert_eq!(signup.validate().unwrap_err(), DraftError::PasswordMismatch);

        signup.confirm_password = "secret".to_string();
        assert_eq!(signup.validate().unwrap().email, "govind@gmail.com");
    }

    #[test]
    fn login_requires_credentials() {
        let login = LoginDraft {
            email: " ".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(
            login.validate().unwrap_err(),
            DraftError::MissingField("Email")
        );
    }
}
