use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::domain::{Transaction, validate};

use super::HEADER;

/// Repository for persisting and reading transactions in a CSV table.
///
/// Every call goes back to the file; nothing is cached between calls.
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository backed by the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with just the header row if it does not exist yet.
    /// An existing file is never modified, so this is safe on every startup.
    pub fn initialize(&self) -> Result<()> {
        if self.path.exists() {
            debug!("ledger file already present: {}", self.path.display());
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        self.write_all(&[])?;
        info!("created ledger file: {}", self.path.display());
        Ok(())
    }

    /// Append one transaction by rewriting the whole table.
    pub fn append(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.read_all()?;
        transactions.push(transaction.clone());
        self.write_all(&transactions)
    }

    /// Read every transaction in file order. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<Transaction>> {
        if !self.path.exists() {
            debug!("ledger file missing, reading as empty: {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open ledger file: {}", self.path.display()))?;

        let mut transactions = Vec::new();
        for result in reader.records() {
            let record = result.context("Failed to read ledger row")?;
            let line = record.position().map_or(0, |p| p.line());

            let field = |i: usize| record.get(i).unwrap_or("");
            let transaction = validate(field(0), field(1), field(2), field(3))
                .with_context(|| format!("Malformed transaction on line {}", line))?;
            transactions.push(transaction);
        }

        debug!(
            "read {} transactions from {}",
            transactions.len(),
            self.path.display()
        );
        Ok(transactions)
    }

    /// Replace the file contents with `transactions`.
    ///
    /// Rows go to a sibling temp file which is then renamed over the ledger,
    /// so a failed write leaves the previous contents in place.
    fn write_all(&self, transactions: &[Transaction]) -> Result<()> {
        let temp_path = self.temp_path();

        let written = Self::write_table(&temp_path, transactions);
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to replace ledger file: {}", self.path.display())
        })?;

        debug!(
            "wrote {} transactions to {}",
            transactions.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_table(path: &Path, transactions: &[Transaction]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;

        writer.write_record(HEADER)?;
        for transaction in transactions {
            writer.write_record(transaction.to_record())?;
        }

        writer.flush().context("Failed to flush ledger rows")?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
