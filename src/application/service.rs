use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::domain::{
    Cents, Transaction, TransactionType, checked_sum, has_month, month_key, summarize_by_type,
    summarize_series, validate,
};
use crate::storage::Repository;

use super::{AppError, SavingsReport, TypeSlice, TypeSummaryReport};

/// Application service providing the operations a front end needs.
/// Holds no UI state: every input arrives as an explicit parameter.
pub struct LedgerService {
    repo: Repository,
}

/// Filter for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// `YYYY-MM`
    pub month: Option<String>,
    pub kind: Option<TransactionType>,
}

impl LedgerService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the ledger at `path`, creating an empty one if needed.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let repo = Repository::new(path.as_ref());
        repo.initialize()?;
        Ok(Self::new(repo))
    }

    /// Open the ledger at `path` without creating anything.
    /// A missing file behaves as an empty ledger until the first write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(Repository::new(path.as_ref()))
    }

    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Validate raw input and store it as a new transaction.
    /// Nothing is written when validation fails.
    pub fn add_transaction(
        &self,
        date: &str,
        kind: &str,
        category: &str,
        amount: &str,
    ) -> Result<Transaction, AppError> {
        let transaction = validate(date, kind, category, amount)?;
        self.repo.append(&transaction)?;

        info!(
            "recorded {} of {} cents on {} ({})",
            transaction.kind,
            transaction.amount_cents,
            transaction.date_string(),
            transaction.category
        );
        Ok(transaction)
    }

    /// All transactions in the order they were recorded.
    pub fn list_all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.read_all()?)
    }

    /// Transactions matching `filter`, in the order they were recorded.
    pub fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let month = filter.month.as_deref().map(normalize_month).transpose()?;
        let mut transactions = self.repo.read_all()?;

        transactions.retain(|t| {
            month.as_ref().is_none_or(|m| &t.month() == m)
                && filter.kind.is_none_or(|k| t.kind == k)
        });
        Ok(transactions)
    }

    /// Totals per transaction type for one month, with each type's share.
    pub fn monthly_type_summary(&self, month: &str) -> Result<TypeSummaryReport, AppError> {
        let month = normalize_month(month)?;
        let transactions = self.repo.read_all()?;

        let totals = summarize_by_type(&transactions, &month)?.ok_or_else(|| AppError::NoData {
            month: month.clone(),
        })?;

        let total = checked_sum(totals.values().copied())?;
        let slices = totals
            .into_iter()
            .map(|(kind, amount)| TypeSlice {
                kind,
                total: amount,
                percentage: share(amount, total),
            })
            .collect();

        Ok(TypeSummaryReport {
            month,
            slices,
            total,
        })
    }

    /// Income, expenses and savings for every month in the ledger.
    ///
    /// When `month` is given it must appear in the ledger, otherwise
    /// `AppError::NoData` is returned. The series itself always spans all
    /// months.
    pub fn monthly_series(&self, month: Option<&str>) -> Result<SavingsReport, AppError> {
        let transactions = self.repo.read_all()?;

        if let Some(month) = month {
            let month = normalize_month(month)?;
            if !has_month(&transactions, &month) {
                return Err(AppError::NoData { month });
            }
        }

        let months = summarize_series(&transactions)?;
        let total_income = checked_sum(months.iter().map(|m| m.income))?;
        let total_expense = checked_sum(months.iter().map(|m| m.expense))?;
        let total_savings = checked_sum(months.iter().map(|m| m.savings))?;

        Ok(SavingsReport {
            months,
            total_income,
            total_expense,
            total_savings,
        })
    }
}

/// Parse a `YYYY-MM` month and return it in canonical form.
pub fn normalize_month(month: &str) -> Result<String, AppError> {
    let trimmed = month.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .map(month_key)
        .map_err(|_| AppError::InvalidMonth(month.to_string()))
}

fn share(amount: Cents, total: Cents) -> f64 {
    if total == 0 {
        0.0
    } else {
        amount as f64 / total as f64 * 100.0
    }
}
