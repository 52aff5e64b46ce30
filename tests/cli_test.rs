use std::fs;
use std::path::Path;

use anyhow::Result;
use budget_tracker::cli::Cli;
use clap::Parser;
use tempfile::TempDir;

fn run(file: &Path, args: &[&str]) -> Result<()> {
    let file = file.to_string_lossy().into_owned();
    let mut argv = vec!["budget-tracker", "--file", file.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv)?.run()
}

#[test]
fn test_add_creates_ledger_file() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");

    run(
        &file,
        &[
            "add", "--date", "2024-03-01", "--type", "Income", "--category", "Salary", "--amount",
            "1500",
        ],
    )?;
    run(
        &file,
        &[
            "add", "--date", "2024/03/04", "-t", "expense", "-c", "Food, drinks", "-a", "12.5",
        ],
    )?;

    assert_eq!(
        fs::read_to_string(&file)?,
        "Date,Type,Category,Amount\n\
         2024-03-01,Income,Salary,1500.00\n\
         2024-03-04,Expense,\"Food, drinks\",12.50\n"
    );
    Ok(())
}

#[test]
fn test_invalid_add_fails_without_writing() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");
    run(&file, &["init"])?;

    let result = run(
        &file,
        &[
            "add", "--date", "2024-03-01", "--category", "Coffee", "--amount", "0.009",
        ],
    );

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&file)?, "Date,Type,Category,Amount\n");
    Ok(())
}

#[test]
fn test_summary_without_data_succeeds() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");

    run(&file, &["summary", "2024-03"])?;
    assert!(!file.exists());

    run(&file, &["init"])?;
    run(&file, &["summary", "2024-03"])?;
    run(&file, &["savings", "--month", "2024-03"])?;
    Ok(())
}

#[test]
fn test_summary_rejects_bad_month() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");

    assert!(run(&file, &["summary", "March"]).is_err());
    Ok(())
}

#[test]
fn test_list_empty_ledger_succeeds() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");
    run(&file, &["init"])?;

    run(&file, &["list"])?;
    run(&file, &["list", "--format", "csv"])?;
    run(&file, &["savings"])?;

    assert_eq!(fs::read_to_string(&file)?, "Date,Type,Category,Amount\n");
    Ok(())
}

#[test]
fn test_reports_on_recorded_ledger_succeed() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");
    fs::write(
        &file,
        "Date,Type,Category,Amount\n\
         2024-01-01,Income,Salary,1000.00\n\
         2024-01-05,Expense,Food,200.00\n",
    )?;

    run(&file, &["list", "--month", "2024-01", "--format", "csv"])?;
    run(&file, &["summary", "2024-01", "--format", "json"])?;
    run(&file, &["savings", "--format", "csv"])?;
    Ok(())
}

#[test]
fn test_export_writes_storage_layout() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");
    let output = temp.path().join("export.csv");
    let contents = "Date,Type,Category,Amount\n\
                    2024-01-01,Income,Salary,1000.00\n\
                    2024-01-05,Expense,\"Food\nand drink\",200.00\n";
    fs::write(&file, contents)?;
    let output_arg = output.to_string_lossy().into_owned();

    run(&file, &["export", "--output", output_arg.as_str()])?;

    assert_eq!(fs::read_to_string(&output)?, contents);
    Ok(())
}

#[test]
fn test_import_records_valid_rows() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("budget.csv");
    let input = temp.path().join("input.csv");
    fs::write(
        &input,
        "Date,Type,Category,Amount\n\
         2024-02-01,Income,Salary,1000\n\
         2024-02-02,Expense,Food,lots\n",
    )?;
    let input_arg = input.to_string_lossy().into_owned();

    run(&file, &["import", input_arg.as_str(), "--dry-run"])?;
    assert_eq!(fs::read_to_string(&file)?, "Date,Type,Category,Amount\n");

    run(&file, &["import", input_arg.as_str()])?;
    assert_eq!(
        fs::read_to_string(&file)?,
        "Date,Type,Category,Amount\n2024-02-01,Income,Salary,1000.00\n"
    );
    Ok(())
}
