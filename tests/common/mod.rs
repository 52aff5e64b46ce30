// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use budget_tracker::application::LedgerService;
use tempfile::TempDir;

/// Helper to create a test service with a temporary ledger file
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("budget_data.csv");
    let service = LedgerService::init(&path)?;
    Ok((service, temp_dir))
}

/// Test fixture: the three-row ledger used across report tests
pub struct SampleLedger;

impl SampleLedger {
    /// Two salaries in January and February, one grocery run in January
    pub fn record(service: &LedgerService) -> Result<()> {
        service.add_transaction("2024-01-01", "Income", "Salary", "1000")?;
        service.add_transaction("2024-01-05", "Expense", "Food", "200")?;
        service.add_transaction("2024-02-01", "Income", "Salary", "1000")?;
        Ok(())
    }
}
