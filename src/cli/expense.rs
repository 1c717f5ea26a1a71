//! Expense CLI commands
//!
//! Implements CLI commands for adding, listing and removing expenses.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_list;
use crate::error::{RendicionError, RendicionResult};
use crate::models::{Attachment, DocumentMeta, ExpenseRecord};
use crate::services::LedgerService;
use crate::storage::Storage;

use super::parse_amount;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        #[arg(long)]
        detail: String,
        /// Amount (e.g. "12500" or "$12.500")
        #[arg(short, long)]
        amount: String,
        /// Expense date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
        /// Document type (Boleta, Factura, ...)
        #[arg(long)]
        doc_type: Option<String>,
        /// Document number
        #[arg(long)]
        doc_number: Option<String>,
        /// Supplier name
        #[arg(short, long)]
        supplier: Option<String>,
        /// Scanned receipt to attach
        #[arg(long)]
        attach: Option<PathBuf>,
    },
    /// List expenses in the order they were recorded
    List,
    /// Remove expenses by their listed number
    #[command(alias = "rm")]
    Remove {
        /// Numbers as shown by `expense list`
        #[arg(required = true)]
        numbers: Vec<usize>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> RendicionResult<()> {
    let service = LedgerService::new(storage);
    let mut ledger = service.load()?;

    match cmd {
        ExpenseCommands::Add {
            detail,
            amount,
            date,
            doc_type,
            doc_number,
            supplier,
            attach,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let mut record = ExpenseRecord::new(date, amount, detail).with_document(DocumentMeta::new(
                doc_type.unwrap_or_default(),
                doc_number.unwrap_or_default(),
                supplier.unwrap_or_default(),
            ));
            if let Some(path) = attach {
                record = record.with_attachment(read_attachment(&path)?);
            }

            let index = service.add_expense(&mut ledger, record)?;
            println!(
                "Added expense #{}: {} {}",
                index + 1,
                date.format("%Y-%m-%d"),
                amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        ExpenseCommands::List => {
            println!("{}", format_expense_list(&ledger, &settings.currency_symbol));
        }

        ExpenseCommands::Remove { numbers } => {
            let mut indices = BTreeSet::new();
            for number in numbers {
                if number == 0 || number > ledger.len() {
                    return Err(RendicionError::expense_not_found(number.to_string()));
                }
                indices.insert(number - 1);
            }

            let removed = service.remove_expenses(&mut ledger, &indices)?;
            for record in &removed {
                println!("Removed: {}", record.description);
            }
            println!("{} expense(s) removed", removed.len());
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> RendicionResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        RendicionError::Validation(format!("Invalid date '{}' (expected YYYY-MM-DD)", s))
    })
}

fn read_attachment(path: &PathBuf) -> RendicionResult<Attachment> {
    let bytes = std::fs::read(path).map_err(|e| {
        RendicionError::Io(format!("Failed to read attachment {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment::new(name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-07").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
        );
        assert!(parse_date("07/03/2025").unwrap_err().is_validation());
    }

    #[test]
    fn test_read_attachment_keeps_file_name() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("boleta 881.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let attachment = read_attachment(&path).unwrap();
        assert_eq!(attachment.name, "boleta 881.jpg");
        assert_eq!(attachment.bytes.len(), 3);
        assert!(read_attachment(&temp_dir.path().join("missing.pdf")).is_err());
    }
}
