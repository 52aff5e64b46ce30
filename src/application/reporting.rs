use serde::{Deserialize, Serialize};

use crate::domain::{Cents, MonthlyBalance, TransactionType};

/// One month split by transaction type (the pie view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSummaryReport {
    pub month: String,
    pub slices: Vec<TypeSlice>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlice {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total: Cents,
    /// Share of the month's total, 0-100
    pub percentage: f64,
}

impl TypeSummaryReport {
    pub fn get(&self, kind: TransactionType) -> Option<Cents> {
        self.slices.iter().find(|s| s.kind == kind).map(|s| s.total)
    }
}

/// Income, expenses and savings for every recorded month (the bar view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsReport {
    pub months: Vec<MonthlyBalance>,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub total_savings: Cents,
}
