use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Fixed set of expense categories.
///
/// Anything the server sends that is not one of these labels (including a
/// missing, `null` or empty category) decodes to [`Category::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Healthcare,
    Education,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Entertainment,
        Self::Bills,
        Self::Healthcare,
        Self::Education,
        Self::Other,
    ];

    /// Returns the label used on the wire and in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(Value::as_str)
            .and_then(Category::from_label)
            .unwrap_or_default())
    }
}

/// Coerces a JSON value into a finite amount.
///
/// Numbers are taken as-is and numeric strings are parsed. Everything else,
/// including values that parse to NaN or infinity, becomes `0.0`.
pub fn coerce_amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|amount| amount.is_finite()).unwrap_or(0.0)
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_amount).unwrap_or(0.0))
}

/// Parses either `YYYY-MM-DD` or an RFC3339 timestamp, keeping the date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date \"{raw}\"")))
}

/// Single record responses come either bare or wrapped under `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(inner) => inner,
        }
    }
}

pub mod expense {
    use super::*;

    /// One spending transaction as stored by the remote service.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Expense {
        /// Server-assigned identifier, `_id` on the wire.
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        #[serde(default)]
        pub title: String,
        /// Always finite, see [`coerce_amount`](crate::coerce_amount).
        #[serde(default, deserialize_with = "lenient_amount")]
        pub amount: f64,
        #[serde(default)]
        pub category: Category,
        #[serde(deserialize_with = "lenient_date")]
        pub date: NaiveDate,
    }

    /// Request body for creating an expense.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct NewExpense {
        pub title: String,
        pub amount: f64,
        pub category: Category,
        pub date: NaiveDate,
    }

    /// Partial update. Absent fields are left untouched by the server.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<Category>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub date: Option<NaiveDate>,
    }

    impl ExpenseUpdate {
        pub fn is_empty(&self) -> bool {
            self.title.is_none()
                && self.amount.is_none()
                && self.category.is_none()
                && self.date.is_none()
        }
    }

    /// Response of `GET /api/expenses`.
    ///
    /// Accepts a bare array or an object carrying the array under `data`.
    /// Any other shape decodes to an empty list. Records that do not decode
    /// are skipped so the rest of the list still loads.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct ExpenseList(pub Vec<Expense>);

    impl ExpenseList {
        pub fn into_vec(self) -> Vec<Expense> {
            self.0
        }
    }

    impl<'de> Deserialize<'de> for ExpenseList {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let items = match Value::deserialize(deserializer)? {
                Value::Array(items) => items,
                Value::Object(mut map) => match map.remove("data") {
                    Some(Value::Array(items)) => items,
                    _ => return Ok(Self::default()),
                },
                _ => return Ok(Self::default()),
            };

            let expenses = items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| match serde_json::from_value::<Expense>(item) {
                    Ok(expense) => Some(expense),
                    Err(err) => {
                        tracing::warn!(index, "skipping malformed expense record: {err}");
                        None
                    }
                })
                .collect();
            Ok(Self(expenses))
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    /// Response of register and login. The token may be missing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: Option<String>,
        pub user: Option<User>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MeResponse {
        pub success: Option<bool>,
        pub user: Option<User>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        #[serde(alias = "_id")]
        pub id: String,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub email: String,
    }

    impl User {
        /// Avatar initial: first letter of the name, else of the email, else `?`.
        pub fn initial(&self) -> char {
            [self.name.trim(), self.email.trim()]
                .into_iter()
                .find_map(|field| field.chars().next())
                .map(|ch| ch.to_uppercase().next().unwrap_or(ch))
                .unwrap_or('?')
        }
    }
}

pub mod error {
    use super::*;

    /// Error body returned by the service, `{message}` or `{error}`.
    #[derive(Debug, Default, Deserialize)]
    pub struct ErrorResponse {
        pub message: Option<String>,
        pub error: Option<String>,
    }

    impl ErrorResponse {
        pub fn into_message(self) -> Option<String> {
            self.message.or(self.error).filter(|msg| !msg.trim().is_empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        auth::User,
        expense::{Expense, ExpenseList, ExpenseUpdate},
        *,
    };

    fn expense(json: Value) -> Expense {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let parsed = expense(serde_json::json!({
            "_id": "a", "title": "t", "amount": 12.5, "category": "Food", "date": "2024-05-01"
        }));
        assert_eq!(parsed.amount, 12.5);

        let parsed = expense(serde_json::json!({
            "_id": "a", "title": "t", "amount": " 7.25 ", "category": "Food", "date": "2024-05-01"
        }));
        assert_eq!(parsed.amount, 7.25);
    }

    #[test]
    fn non_numeric_amount_becomes_zero() {
        for amount in [
            serde_json::json!("abc"),
            serde_json::json!("NaN"),
            serde_json::json!(null),
            serde_json::json!(true),
        ] {
            let parsed = expense(serde_json::json!({
                "_id": "a", "title": "t", "amount": amount, "date": "2024-05-01"
            }));
            assert_eq!(parsed.amount, 0.0);
        }

        let parsed = expense(serde_json::json!({"_id": "a", "date": "2024-05-01"}));
        assert_eq!(parsed.amount, 0.0);
    }

    #[test]
    fn missing_empty_or_unknown_category_is_other() {
        let missing = expense(serde_json::json!({"_id": "a", "amount": 1, "date": "2024-05-01"}));
        assert_eq!(missing.category, Category::Other);

        let empty = expense(serde_json::json!({
            "_id": "a", "amount": 1, "category": "", "date": "2024-05-01"
        }));
        assert_eq!(empty.category, Category::Other);

        let null = expense(serde_json::json!({
            "_id": "a", "amount": 1, "category": null, "date": "2024-05-01"
        }));
        assert_eq!(null.category, Category::Other);

        let unknown = expense(serde_json::json!({
            "_id": "a", "amount": 1, "category": "Pets", "date": "2024-05-01"
        }));
        assert_eq!(unknown.category, Category::Other);

        let numeric = expense(serde_json::json!({
            "_id": "a", "amount": 1, "category": 3, "date": "2024-05-01"
        }));
        assert_eq!(numeric.category, Category::Other);
    }

    #[test]
    fn date_accepts_timestamps() {
        let parsed = expense(serde_json::json!({
            "_id": "a", "amount": 1, "date": "2024-05-01T00:00:00.000Z"
        }));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(parse_date("not a date").is_none());
    }

    #[test]
    fn id_accepts_underscore_or_plain() {
        let underscore = expense(serde_json::json!({"_id": "x1", "date": "2024-05-01"}));
        let plain = expense(serde_json::json!({"id": "x1", "date": "2024-05-01"}));
        assert_eq!(underscore.id, "x1");
        assert_eq!(plain.id, "x1");
    }

    #[test]
    fn list_accepts_bare_array_or_envelope() {
        let record = serde_json::json!({"_id": "a", "amount": 1, "date": "2024-05-01"});

        let bare: ExpenseList = serde_json::from_value(serde_json::json!([record.clone()])).unwrap();
        assert_eq!(bare.0.len(), 1);

        let wrapped: ExpenseList =
            serde_json::from_value(serde_json::json!({"success": true, "data": [record.clone()]})).unwrap();
        assert_eq!(wrapped.0.len(), 1);

        let odd: ExpenseList =
            serde_json::from_value(serde_json::json!({"data": {"not": "a list"}})).unwrap();
        assert!(odd.0.is_empty());

        let mixed: ExpenseList = serde_json::from_value(serde_json::json!([
            record,
            {"_id": "b", "title": "no date", "amount": 5},
            {"_id": "c", "amount": 2, "category": ["Food"], "date": 20240501},
        ]))
        .unwrap();
        assert_eq!(mixed.0.len(), 1);
        assert_eq!(mixed.0[0].id, "a");
    }

    #[test]
    fn envelope_unwraps_single_records() {
        let record = serde_json::json!({"_id": "a", "amount": 3, "date": "2024-05-01"});
        let wrapped: Envelope<Expense> =
            serde_json::from_value(serde_json::json!({"data": record.clone()})).unwrap();
        let bare: Envelope<Expense> = serde_json::from_value(record).unwrap();
        assert_eq!(wrapped.into_inner(), bare.into_inner());
    }

    #[test]
    fn partial_update_omits_absent_fields() {
        let update = ExpenseUpdate {
            amount: Some(9.0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"amount": 9.0})
        );
    }

    #[test]
    fn user_initial_falls_back_to_email_then_question_mark() {
        let mut user = User {
            id: "1".to_string(),
            name: "  govind".to_string(),
            email: "x@y.z".to_string(),
        };
        assert_eq!(user.initial(), 'G');
        user.name = String::new();
        assert_eq!(user.initial(), 'X');
        user.email = " ".to_string();
        assert_eq!(user.initial(), '?');
    }

    #[test]
    fn category_labels_round_trip_case_insensitively() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert!("groceries".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_value(Category::Healthcare).unwrap(),
            serde_json::json!("Healthcare")
        );
    }
}
