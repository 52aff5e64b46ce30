use anyhow::Result;
use log::warn;
use std::io::Read;

use crate::application::{AppError, LedgerService};
use crate::domain::validate;

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// A row that could not be imported
#[derive(Debug, Clone)]
pub struct ImportError {
    /// Line in the source where the row starts
    pub line: u64,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every row but write nothing
    pub dry_run: bool,
}

/// Importer for loading rows into the ledger
pub struct Importer<'a> {
    service: &'a LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Import `Date,Type,Category,Amount` rows from CSV.
    ///
    /// Each row is validated on its own; bad rows are reported and skipped,
    /// good rows are appended in file order.
    pub fn import_csv<R: Read>(&self, reader: R, options: ImportOptions) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let mut imported = 0;
        let mut errors = Vec::new();

        for result in csv_reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line: e.position().map_or(0, |p| p.line()),
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            let field = |i: usize| record.get(i).unwrap_or("");
            let (date, kind, category, amount) = (field(0), field(1), field(2), field(3));

            let outcome = if options.dry_run {
                validate(date, kind, category, amount)
                    .map(|_| ())
                    .map_err(AppError::from)
            } else {
                self.service
                    .add_transaction(date, kind, category, amount)
                    .map(|_| ())
            };

            match outcome {
                Ok(()) => imported += 1,
                // Storage failures abort the import; only bad rows are skipped
                Err(AppError::Storage(e)) => return Err(e),
                Err(e) => {
                    warn!("skipping import line {}: {}", line, e);
                    errors.push(ImportError {
                        line,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(ImportResult { imported, errors })
    }
}
