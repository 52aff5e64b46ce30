use std::fs::File;
use std::io::{self, BufReader, BufWriter};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{AppError, LedgerService, TransactionFilter};
use crate::domain::{Transaction, TransactionType, ValidationError, format_cents};
use crate::io::{Exporter, ImportOptions, Importer};
use crate::logging::init_logging;
use crate::storage::{DEFAULT_LEDGER_FILE, HEADER};

/// Budget Tracker - Personal income and expense ledger
#[derive(Parser)]
#[command(name = "budget-tracker")]
#[command(about = "Record income and expenses and see monthly summaries and savings")]
#[command(version)]
pub struct Cli {
    /// Ledger CSV file path
    #[arg(short, long, env = "BUDGET_FILE", default_value = DEFAULT_LEDGER_FILE)]
    pub file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger file if it does not exist
    Init,

    /// Record an income or expense
    Add {
        /// Date of the transaction (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Transaction type: Income or Expense
        #[arg(short = 't', long = "type", default_value = "Income")]
        kind: String,

        /// Category (e.g., "Salary", "Food")
        #[arg(short, long)]
        category: String,

        /// Amount (e.g., "50.00" or "50")
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,
    },

    /// List recorded transactions
    List {
        /// Only show this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Only show this type: Income or Expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Income vs expense breakdown for one month
    Summary {
        /// Month to summarize (YYYY-MM)
        month: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Monthly income, expenses and savings
    Savings {
        /// Require this month (YYYY-MM) to have data before showing the series
        #[arg(short, long)]
        month: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Export the ledger to CSV or JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Import transactions from a Date,Type,Category,Amount CSV file
    Import {
        /// Input file
        input: String,

        /// Validate rows without recording them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        let result = match self.command {
            Commands::Init => {
                LedgerService::init(&self.file)?;
                println!("Ledger initialized: {}", self.file);
                Ok(())
            }

            Commands::Add {
                date,
                kind,
                category,
                amount,
            } => {
                let service = LedgerService::init(&self.file)?;
                let transaction = service.add_transaction(&date, &kind, &category, &amount)?;
                println!(
                    "Transaction added: {} {} {} ({})",
                    transaction.date_string(),
                    transaction.kind,
                    format_cents(transaction.amount_cents),
                    transaction.category
                );
                Ok(())
            }

            Commands::List {
                month,
                kind,
                format,
            } => {
                let service = LedgerService::open(&self.file);
                run_list_command(&service, month, kind, format)
            }

            Commands::Summary { month, format } => {
                let service = LedgerService::open(&self.file);
                run_summary_command(&service, &month, format)
            }

            Commands::Savings { month, format } => {
                let service = LedgerService::open(&self.file);
                run_savings_command(&service, month.as_deref(), format)
            }

            Commands::Export { output, format } => {
                let service = LedgerService::open(&self.file);
                run_export_command(&service, output.as_deref(), format)
            }

            Commands::Import { input, dry_run } => {
                let service = LedgerService::init(&self.file)?;
                run_import_command(&service, &input, dry_run)
            }
        };

        match result {
            Err(AppError::NoData { month }) => {
                println!("No data for month {}.", month);
                Ok(())
            }
            other => Ok(other?),
        }
    }
}

fn run_list_command(
    service: &LedgerService,
    month: Option<String>,
    kind: Option<String>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let kind = kind
        .map(|k| {
            TransactionType::from_str(&k)
                .ok_or_else(|| ValidationError::InvalidType(k.clone()))
        })
        .transpose()?;

    let transactions = service.list_transactions(TransactionFilter { month, kind })?;

    match format {
        OutputFormat::Json => print_json(&transactions)?,
        OutputFormat::Csv => print_transactions_csv(&transactions)?,
        OutputFormat::Table => {
            if transactions.is_empty() {
                println!("No transactions available.");
                return Ok(());
            }
            print_transactions_table(&transactions);
        }
    }
    Ok(())
}

fn print_transactions_table(transactions: &[Transaction]) {
    println!(
        "{:<12} {:<8} {:<24} {:>12}",
        "DATE", "TYPE", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(59));
    for t in transactions {
        println!(
            "{:<12} {:<8} {:<24} {:>12}",
            t.date_string(),
            t.kind,
            truncate(&t.category, 24),
            format_cents(t.amount_cents)
        );
    }
}

fn print_transactions_csv(transactions: &[Transaction]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(HEADER).context("Failed to write CSV")?;
    for t in transactions {
        writer.write_record(t.to_record()).context("Failed to write CSV")?;
    }
    writer.flush().context("Failed to write CSV")?;
    Ok(())
}

fn run_summary_command(
    service: &LedgerService,
    month: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let report = service.monthly_type_summary(month)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Csv => {
            println!("type,total,percentage");
            for slice in &report.slices {
                println!(
                    "{},{},{:.1}",
                    slice.kind,
                    format_cents(slice.total),
                    slice.percentage
                );
            }
        }
        OutputFormat::Table => {
            println!("Monthly Summary - {}", report.month);
            println!();
            println!("{:<10} {:>12} {:>8}", "TYPE", "TOTAL", "SHARE");
            println!("{}", "-".repeat(32));
            for slice in &report.slices {
                println!(
                    "{:<10} {:>12} {:>7.1}%",
                    slice.kind.as_str(),
                    format_cents(slice.total),
                    slice.percentage
                );
            }
        }
    }
    Ok(())
}

fn run_savings_command(
    service: &LedgerService,
    month: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let report = service.monthly_series(month)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Csv => {
            println!("month,income,expenses,savings");
            for m in &report.months {
                println!(
                    "{},{},{},{}",
                    m.month,
                    format_cents(m.income),
                    format_cents(m.expense),
                    format_cents(m.savings)
                );
            }
        }
        OutputFormat::Table => {
            if report.months.is_empty() {
                println!("No transactions available.");
                return Ok(());
            }
            println!("Monthly Income, Expenses & Savings");
            println!();
            println!(
                "{:<10} {:>12} {:>12} {:>12}",
                "MONTH", "INCOME", "EXPENSES", "SAVINGS"
            );
            println!("{}", "-".repeat(49));
            for m in &report.months {
                println!(
                    "{:<10} {:>12} {:>12} {:>12}",
                    m.month,
                    format_cents(m.income),
                    format_cents(m.expense),
                    format_cents(m.savings)
                );
            }
            println!("{}", "-".repeat(49));
            println!(
                "{:<10} {:>12} {:>12} {:>12}",
                "TOTAL",
                format_cents(report.total_income),
                format_cents(report.total_expense),
                format_cents(report.total_savings)
            );
        }
    }
    Ok(())
}

fn run_export_command(
    service: &LedgerService,
    output: Option<&str>,
    format: ExportFormat,
) -> Result<(), AppError> {
    let writer: Box<dyn io::Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        )),
        None => Box::new(io::stdout()),
    };

    let exporter = Exporter::new(service);
    match format {
        ExportFormat::Csv => {
            let count = exporter.export_csv(writer)?;
            eprintln!("Exported {} transactions", count);
        }
        ExportFormat::Json => {
            let snapshot = exporter.export_json(writer)?;
            eprintln!("Exported {} transactions", snapshot.transactions.len());
        }
    }
    Ok(())
}

fn run_import_command(service: &LedgerService, input: &str, dry_run: bool) -> Result<(), AppError> {
    let file = File::open(input).with_context(|| format!("Failed to open input file: {}", input))?;
    let result =
        Importer::new(service).import_csv(BufReader::new(file), ImportOptions { dry_run })?;

    if dry_run {
        println!("Validation complete (nothing recorded)");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!("  Line {}: {}", error.line, error.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Food", 10), "Food");
        assert_eq!(truncate("Groceries and more", 10), "Groceri...");
    }

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::try_parse_from([
            "budget-tracker",
            "--file",
            "ledger.csv",
            "add",
            "--date",
            "2024-01-05",
            "--type",
            "Expense",
            "--category",
            "Food",
            "--amount",
            "-12.50",
        ])
        .unwrap();

        assert_eq!(cli.file, "ledger.csv");
        match cli.command {
            Commands::Add { kind, amount, .. } => {
                assert_eq!(kind, "Expense");
                assert_eq!(amount, "-12.50");
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_summary_format() {
        let cli =
            Cli::try_parse_from(["budget-tracker", "summary", "2024-01", "--format", "json"])
                .unwrap();

        match cli.command {
            Commands::Summary { month, format } => {
                assert_eq!(month, "2024-01");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected summary command"),
        }
    }
}
