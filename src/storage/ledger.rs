//! Ledger repository for JSON storage
//!
//! Manages loading and saving the ledger to gastos.json

use std::path::{Path, PathBuf};

use crate::error::RendicionError;
use crate::models::Ledger;

use super::file_io::{read_text_optional, write_bytes_atomic};
use super::format::{parse_ledger, serialize_ledger};

/// Repository for ledger persistence
pub struct LedgerRepository {
    path: PathBuf,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger from disk
    ///
    /// A missing file yields an empty ledger; a file that cannot be parsed
    /// is a format error and nothing is loaded.
    pub fn load(&self) -> Result<Ledger, RendicionError> {
        match read_text_optional(&self.path)? {
            Some(contents) => {
                let ledger = parse_ledger(&contents)?;
                tracing::debug!(
                    path = %self.path.display(),
                    records = ledger.len(),
                    "Loaded ledger"
                );
                Ok(ledger)
            }
            None => {
                tracing::debug!(path = %self.path.display(), "No ledger file, starting empty");
                Ok(Ledger::new())
            }
        }
    }

    /// Save the ledger to disk
    pub fn save(&self, ledger: &Ledger) -> Result<(), RendicionError> {
        let bytes = serialize_ledger(ledger)?;
        write_bytes_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), records = ledger.len(), "Saved ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseRecord, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = LedgerRepository::new(temp_dir.path().join("gastos.json"));

        let ledger = repo.load().unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.initial_fund().is_zero());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = LedgerRepository::new(temp_dir.path().join("data").join("gastos.json"));

        let mut ledger = Ledger::new();
        ledger.set_initial_fund(Money::from_units(100000)).unwrap();
        ledger
            .add_expense(ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                Money::from_units(4500),
                "Resmas",
            ))
            .unwrap();
        ledger.set_meta("institucion", "SLEP Petorca");

        repo.save(&ledger).unwrap();
        let loaded = repo.load().unwrap();
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn test_corrupt_file_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gastos.json");
        std::fs::write(&path, "{\"gastos\": [").unwrap();

        let err = LedgerRepository::new(path).load().unwrap_err();
        assert!(err.is_format());
    }
}
