use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AmountOverflow, Cents, Transaction, TransactionType, checked_total};

/// Income, expense and savings for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    /// `YYYY-MM`
    pub month: String,
    pub income: Cents,
    pub expense: Cents,
    /// income - expense
    pub savings: Cents,
}

/// Derive the `YYYY-MM` grouping key from a date.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// True when at least one transaction falls in `month`.
pub fn has_month(transactions: &[Transaction], month: &str) -> bool {
    transactions.iter().any(|t| t.month() == month)
}

/// Sum amounts per type for a single month.
///
/// Returns `Ok(None)` when no transaction falls in `month`. Types with no
/// transactions that month are left out rather than reported as zero.
pub fn summarize_by_type(
    transactions: &[Transaction],
    month: &str,
) -> Result<Option<BTreeMap<TransactionType, Cents>>, AmountOverflow> {
    let mut totals: BTreeMap<TransactionType, Cents> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.month() == month) {
        let total = totals.entry(transaction.kind).or_insert(0);
        *total = checked_total(*total, transaction.amount_cents)?;
    }

    Ok(if totals.is_empty() { None } else { Some(totals) })
}

/// Income/expense/savings for every month present in the ledger, ascending.
///
/// A month with only one type gets zero for the other. Fails only when a
/// monthly total does not fit in `Cents`.
pub fn summarize_series(
    transactions: &[Transaction],
) -> Result<Vec<MonthlyBalance>, AmountOverflow> {
    let mut by_month: BTreeMap<String, (Cents, Cents)> = BTreeMap::new();

    for transaction in transactions {
        let (income, expense) = by_month.entry(transaction.month()).or_insert((0, 0));
        let total = match transaction.kind {
            TransactionType::Income => income,
            TransactionType::Expense => expense,
        };
        *total = checked_total(*total, transaction.amount_cents)?;
    }

    by_month
        .into_iter()
        .map(|(month, (income, expense))| {
            let savings = income.checked_sub(expense).ok_or(AmountOverflow)?;
            Ok(MonthlyBalance {
                month,
                income,
                expense,
                savings,
            })
        })
        .collect()
}
