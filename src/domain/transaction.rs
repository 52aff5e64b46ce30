use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Cents, format_cents, parse_cents};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// Case-insensitive, so `income` and `INCOME` are both accepted.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One recorded money movement. Transactions are never edited once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar day the money moved
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    /// Amount in cents. Expenses are stored positive.
    pub amount_cents: Cents,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        Self {
            date,
            kind,
            category: category.into(),
            amount_cents,
        }
    }

    /// Canonical `YYYY-MM-DD` form of the date.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// The `YYYY-MM` key this transaction is grouped under.
    pub fn month(&self) -> String {
        super::month_key(self.date)
    }

    /// Row fields in `Date,Type,Category,Amount` order, as written to disk.
    pub fn to_record(&self) -> [String; 4] {
        [
            self.date_string(),
            self.kind.to_string(),
            self.category.clone(),
            format_cents(self.amount_cents),
        ]
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input field names, used to report which one was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Type,
    Category,
    Amount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Date => "date",
            Field::Type => "type",
            Field::Category => "category",
            Field::Amount => "amount",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(Field),
    InvalidDate(String),
    InvalidType(String),
    InvalidAmount(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => {
                write!(f, "All fields are required: {} is missing", field)
            }
            ValidationError::InvalidDate(input) => {
                write!(f, "Invalid date '{}' (expected YYYY-MM-DD)", input)
            }
            ValidationError::InvalidType(input) => {
                write!(f, "Invalid type '{}' (expected Income or Expense)", input)
            }
            ValidationError::InvalidAmount(input) => {
                write!(f, "Invalid amount '{}' (expected a number like 50.00)", input)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check raw form input and build a normalized transaction.
///
/// Presence of all four fields is checked before anything is parsed, so a
/// blank field is always reported as `MissingField`.
pub fn validate(
    date: &str,
    kind: &str,
    category: &str,
    amount: &str,
) -> Result<Transaction, ValidationError> {
    for (field, value) in [
        (Field::Date, date),
        (Field::Type, kind),
        (Field::Category, category),
        (Field::Amount, amount),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    let parsed_date =
        parse_date(date).ok_or_else(|| ValidationError::InvalidDate(date.to_string()))?;
    let parsed_kind = TransactionType::from_str(kind)
        .ok_or_else(|| ValidationError::InvalidType(kind.to_string()))?;
    let amount_cents =
        parse_cents(amount).map_err(|_| ValidationError::InvalidAmount(amount.to_string()))?;

    Ok(Transaction::new(
        parsed_date,
        parsed_kind,
        category.trim(),
        amount_cents,
    ))
}

/// Parse a calendar date from `YYYY-MM-DD`, `YYYY/MM/DD` or an RFC 3339
/// timestamp (time part dropped).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
