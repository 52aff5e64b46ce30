mod repository;

pub use repository::*;

/// Column header of the ledger file, in storage order.
pub const HEADER: [&str; 4] = ["Date", "Type", "Category", "Amount"];

/// Ledger file used when no path is given.
pub const DEFAULT_LEDGER_FILE: &str = "budget_data.csv";
